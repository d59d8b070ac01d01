use anyhow::Context;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::db;
use crate::models::{AttendanceRecord, Course, CourseEnrollment, Student, Teacher};
use crate::seed;

const K_STUDENTS: &str = "students";
const K_TEACHERS: &str = "teachers";
const K_COURSES: &str = "courses";
const K_ATTENDANCE: &str = "attendance";
const K_ENROLLMENTS: &str = "enrollments";

/// An entity collection stored as one JSON blob under one key.
///
/// The seed is written only when the key is absent entirely; a collection
/// emptied by deletes keeps its (empty) blob and is never reseeded.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const KEY: &'static str;
    fn id(&self) -> &str;
    fn seed() -> Vec<Self>;
}

impl Record for Student {
    const KEY: &'static str = K_STUDENTS;
    fn id(&self) -> &str {
        &self.id
    }
    fn seed() -> Vec<Self> {
        seed::initial_students()
    }
}

impl Record for Teacher {
    const KEY: &'static str = K_TEACHERS;
    fn id(&self) -> &str {
        &self.id
    }
    fn seed() -> Vec<Self> {
        seed::initial_teachers()
    }
}

impl Record for Course {
    const KEY: &'static str = K_COURSES;
    fn id(&self) -> &str {
        &self.id
    }
    fn seed() -> Vec<Self> {
        seed::initial_courses()
    }
}

/// Sole owner of durable state. Every operation re-reads the full collection
/// from the kv substrate and rewrites it wholesale; at this data scale (tens
/// to low hundreds of records) that is the simplest correct protocol.
pub struct SchoolStore {
    conn: Connection,
}

impl SchoolStore {
    pub fn open(workspace: &Path) -> anyhow::Result<Self> {
        let conn = db::open_db(workspace)?;
        Ok(Self { conn })
    }

    /// Malformed blobs fail loudly, naming the collection. Reseeding here
    /// would silently destroy data; only an absent key triggers the seed.
    fn load_blob<T: DeserializeOwned>(
        &self,
        key: &str,
        raw: &str,
    ) -> anyhow::Result<Vec<T>> {
        serde_json::from_str(raw)
            .with_context(|| format!("corrupt stored collection '{}'", key))
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> anyhow::Result<()> {
        let raw = serde_json::to_string(items)?;
        db::kv_put(&self.conn, key, &raw)
    }

    fn load_or_seed<T: Record>(&self) -> anyhow::Result<Vec<T>> {
        match db::kv_get(&self.conn, T::KEY)? {
            Some(raw) => self.load_blob(T::KEY, &raw),
            None => {
                let seeded = T::seed();
                self.write_collection(T::KEY, &seeded)?;
                Ok(seeded)
            }
        }
    }

    fn load_or_empty<T: DeserializeOwned + Serialize>(
        &self,
        key: &str,
    ) -> anyhow::Result<Vec<T>> {
        match db::kv_get(&self.conn, key)? {
            Some(raw) => self.load_blob(key, &raw),
            None => {
                self.write_collection::<T>(key, &[])?;
                Ok(Vec::new())
            }
        }
    }

    pub fn list<T: Record>(&self) -> anyhow::Result<Vec<T>> {
        self.load_or_seed()
    }

    /// Insert-or-replace by id. A replaced entity keeps its original
    /// position; a new one is appended. Callers supply the complete entity;
    /// there is no field-level merge.
    pub fn save<T: Record>(&self, entity: &T) -> anyhow::Result<()> {
        let mut items: Vec<T> = self.load_or_seed()?;
        match items.iter().position(|e| e.id() == entity.id()) {
            Some(index) => items[index] = entity.clone(),
            None => items.push(entity.clone()),
        }
        self.write_collection(T::KEY, &items)
    }

    /// Remove by id. Returns whether anything was removed. Cascades for
    /// Student and Course live in the typed wrappers below.
    fn delete_record<T: Record>(&self, id: &str) -> anyhow::Result<bool> {
        let mut items: Vec<T> = self.load_or_seed()?;
        let before = items.len();
        items.retain(|e| e.id() != id);
        let removed = items.len() != before;
        if removed {
            self.write_collection(T::KEY, &items)?;
        }
        Ok(removed)
    }

    /// Deleting a student also drops every enrollment row that references
    /// them. Returns (student_removed, enrollments_removed).
    pub fn delete_student(&self, id: &str) -> anyhow::Result<(bool, usize)> {
        let removed = self.delete_record::<Student>(id)?;
        let dropped = self.retain_enrollments(|e| e.student_id != id)?;
        Ok((removed, dropped))
    }

    /// Deleting a course drops every enrollment row for that course.
    pub fn delete_course(&self, id: &str) -> anyhow::Result<(bool, usize)> {
        let removed = self.delete_record::<Course>(id)?;
        let dropped = self.retain_enrollments(|e| e.course_id != id)?;
        Ok((removed, dropped))
    }

    pub fn delete_teacher(&self, id: &str) -> anyhow::Result<bool> {
        self.delete_record::<Teacher>(id)
    }

    pub fn enrollments(&self) -> anyhow::Result<Vec<CourseEnrollment>> {
        self.load_or_empty(K_ENROLLMENTS)
    }

    /// Idempotent insert: a pair already present is left alone. Capacity is
    /// deliberately NOT checked here; that precondition belongs to the
    /// caller, and this call will exceed capacity if invoked directly.
    pub fn enroll(&self, course_id: &str, student_id: &str) -> anyhow::Result<()> {
        let mut rows = self.enrollments()?;
        let exists = rows
            .iter()
            .any(|e| e.course_id == course_id && e.student_id == student_id);
        if !exists {
            rows.push(CourseEnrollment {
                course_id: course_id.to_string(),
                student_id: student_id.to_string(),
            });
            self.write_collection(K_ENROLLMENTS, &rows)?;
        }
        Ok(())
    }

    /// No-op when the pair is absent.
    pub fn unenroll(&self, course_id: &str, student_id: &str) -> anyhow::Result<()> {
        self.retain_enrollments(|e| {
            !(e.course_id == course_id && e.student_id == student_id)
        })?;
        Ok(())
    }

    fn retain_enrollments<F>(&self, keep: F) -> anyhow::Result<usize>
    where
        F: Fn(&CourseEnrollment) -> bool,
    {
        let mut rows = self.enrollments()?;
        let before = rows.len();
        rows.retain(|e| keep(e));
        let dropped = before - rows.len();
        if dropped > 0 {
            self.write_collection(K_ENROLLMENTS, &rows)?;
        }
        Ok(dropped)
    }

    pub fn attendance_for_date(&self, date: &str) -> anyhow::Result<Vec<AttendanceRecord>> {
        let all: Vec<AttendanceRecord> = self.load_or_empty(K_ATTENDANCE)?;
        Ok(all.into_iter().filter(|r| r.date == date).collect())
    }

    /// Replace-semantics batch save: every stored record for the batch date
    /// (taken from the first record) is dropped, then the batch is appended.
    /// A student omitted from the batch loses their record for that date.
    /// An empty batch is a no-op.
    pub fn save_attendance_batch(&self, records: &[AttendanceRecord]) -> anyhow::Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        let date = first.date.clone();
        let mut all: Vec<AttendanceRecord> = self.load_or_empty(K_ATTENDANCE)?;
        all.retain(|r| r.date != date);
        all.extend(records.iter().cloned());
        self.write_collection(K_ATTENDANCE, &all)
    }
}
