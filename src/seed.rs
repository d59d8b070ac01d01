//! Default roster written to a fresh workspace on first access.

use crate::models::{
    Course, GradeLevel, Student, StudentStatus, Teacher, TeacherStatus,
};

fn student(
    id: &str,
    first_name: &str,
    last_name: &str,
    email: &str,
    grade: GradeLevel,
    class: &str,
    attendance: f64,
    performance_score: f64,
    enrollment_date: &str,
    parent_contact: &str,
    status: StudentStatus,
) -> Student {
    Student {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        grade,
        class: class.to_string(),
        attendance,
        performance_score,
        enrollment_date: enrollment_date.to_string(),
        parent_contact: parent_contact.to_string(),
        status,
        profile_image: None,
    }
}

pub fn initial_students() -> Vec<Student> {
    vec![
        student(
            "S1001",
            "Alice",
            "Johnson",
            "alice.j@school.edu",
            GradeLevel::Tenth,
            "10-A",
            95.0,
            88.0,
            "2023-09-01",
            "+1234567890",
            StudentStatus::Active,
        ),
        student(
            "S1002",
            "Bob",
            "Smith",
            "bob.s@school.edu",
            GradeLevel::Eleventh,
            "11-B",
            82.0,
            74.0,
            "2023-09-01",
            "+1234567891",
            StudentStatus::Active,
        ),
        student(
            "S1003",
            "Charlie",
            "Davis",
            "charlie.d@school.edu",
            GradeLevel::Ninth,
            "9-C",
            98.0,
            92.0,
            "2023-09-01",
            "+1234567892",
            StudentStatus::Active,
        ),
        student(
            "S1004",
            "Diana",
            "Prince",
            "diana.p@school.edu",
            GradeLevel::Twelfth,
            "12-A",
            65.0,
            45.0,
            "2022-09-01",
            "+1234567893",
            StudentStatus::Inactive,
        ),
        student(
            "S1005",
            "Ethan",
            "Hunt",
            "ethan.h@school.edu",
            GradeLevel::Tenth,
            "10-A",
            89.0,
            81.0,
            "2023-09-01",
            "+1234567894",
            StudentStatus::Active,
        ),
    ]
}

pub fn initial_teachers() -> Vec<Teacher> {
    vec![
        Teacher {
            id: "T2001".to_string(),
            name: "Dr. Sarah Connor".to_string(),
            subject: "Mathematics".to_string(),
            email: "s.connor@school.edu".to_string(),
            experience: 12.0,
            assigned_classes: vec!["10-A".to_string(), "11-A".to_string()],
            status: TeacherStatus::Available,
        },
        Teacher {
            id: "T2002".to_string(),
            name: "Prof. James Wilson".to_string(),
            subject: "Physics".to_string(),
            email: "j.wilson@school.edu".to_string(),
            experience: 15.0,
            assigned_classes: vec!["11-B".to_string(), "12-A".to_string()],
            status: TeacherStatus::Available,
        },
        Teacher {
            id: "T2003".to_string(),
            name: "Ms. Elena Gilbert".to_string(),
            subject: "English".to_string(),
            email: "e.gilbert@school.edu".to_string(),
            experience: 8.0,
            assigned_classes: vec!["9-C".to_string(), "10-A".to_string()],
            status: TeacherStatus::Available,
        },
    ]
}

pub fn initial_courses() -> Vec<Course> {
    vec![
        Course {
            id: "C301".to_string(),
            title: "Advanced Algebra".to_string(),
            teacher_name: "Dr. Sarah Connor".to_string(),
            schedule: "Mon, Wed 09:00 AM".to_string(),
            credits: 4.0,
            room: "Room 102".to_string(),
            capacity: 30,
        },
        Course {
            id: "C302".to_string(),
            title: "Quantum Physics".to_string(),
            teacher_name: "Prof. James Wilson".to_string(),
            schedule: "Tue, Thu 11:00 AM".to_string(),
            credits: 5.0,
            room: "Lab A".to_string(),
            capacity: 25,
        },
        Course {
            id: "C303".to_string(),
            title: "Creative Writing".to_string(),
            teacher_name: "Ms. Elena Gilbert".to_string(),
            schedule: "Fri 02:00 PM".to_string(),
            credits: 3.0,
            room: "Library Annex".to_string(),
            capacity: 20,
        },
    ]
}
