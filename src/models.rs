use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeLevel {
    #[serde(rename = "9th")]
    Ninth,
    #[serde(rename = "10th")]
    Tenth,
    #[serde(rename = "11th")]
    Eleventh,
    #[serde(rename = "12th")]
    Twelfth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudentStatus {
    Active,
    Inactive,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeacherStatus {
    Available,
    #[serde(rename = "On Leave")]
    OnLeave,
    Busy,
}

/// One letter per mark so the stored attendance blob stays compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[serde(rename = "P")]
    Present,
    #[serde(rename = "A")]
    Absent,
    #[serde(rename = "L")]
    Late,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub grade: GradeLevel,
    /// Homeroom section label, e.g. "10-A".
    pub class: String,
    /// Attendance percentage, 0-100.
    pub attendance: f64,
    /// 0-100.
    pub performance_score: f64,
    pub enrollment_date: String,
    pub parent_contact: String,
    pub status: StudentStatus,
    /// Opaque encoded image blob; omitted from the stored record when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub email: String,
    /// Years of experience.
    pub experience: f64,
    pub assigned_classes: Vec<String>,
    pub status: TeacherStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    /// Denormalized display copy; renaming a Teacher does not rewrite this.
    pub teacher_name: String,
    pub schedule: String,
    pub credits: f64,
    pub room: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEnrollment {
    pub course_id: String,
    pub student_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: String,
    /// YYYY-MM-DD.
    pub date: String,
    pub status: AttendanceStatus,
}

/// Derived on every request; never written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolStats {
    pub total_students: usize,
    pub total_teachers: usize,
    /// Rounded to the nearest integer; 0 for an empty roster.
    pub average_attendance: i64,
    pub active_classes: usize,
}
