//! Pure aggregation over collection snapshots. No storage access, no side
//! effects; callers pass in whatever the store returned.

use serde::Serialize;

use crate::models::{Course, CourseEnrollment, SchoolStats, Student, Teacher};

/// Strict thresholds: a student sitting exactly on either value is not
/// flagged.
pub const AT_RISK_ATTENDANCE: f64 = 75.0;
pub const AT_RISK_PERFORMANCE: f64 = 60.0;

pub fn compute_stats(
    students: &[Student],
    teachers: &[Teacher],
    courses: &[Course],
) -> SchoolStats {
    let average_attendance = if students.is_empty() {
        0
    } else {
        let total: f64 = students.iter().map(|s| s.attendance).sum();
        (total / students.len() as f64).round() as i64
    };

    SchoolStats {
        total_students: students.len(),
        total_teachers: teachers.len(),
        average_attendance,
        active_classes: courses.len(),
    }
}

/// Highest performance score first; ties keep their roster order.
pub fn top_performers(students: &[Student], n: usize) -> Vec<Student> {
    let mut ranked: Vec<Student> = students.to_vec();
    ranked.sort_by(|a, b| b.performance_score.total_cmp(&a.performance_score));
    ranked.truncate(n);
    ranked
}

pub fn at_risk(students: &[Student]) -> Vec<Student> {
    students
        .iter()
        .filter(|s| {
            s.attendance < AT_RISK_ATTENDANCE || s.performance_score < AT_RISK_PERFORMANCE
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityView {
    pub enrolled_count: usize,
    pub is_full: bool,
    /// Fill ratio as a percentage, clamped to 100.
    pub percent_full: f64,
}

pub fn course_capacity(course: &Course, enrollments: &[CourseEnrollment]) -> CapacityView {
    let enrolled_count = enrollments
        .iter()
        .filter(|e| e.course_id == course.id)
        .count();
    let denom = course.capacity.max(1) as f64;
    let percent_full = (enrolled_count as f64 / denom * 100.0).min(100.0);
    CapacityView {
        enrolled_count,
        is_full: enrolled_count >= course.capacity as usize,
        percent_full,
    }
}
