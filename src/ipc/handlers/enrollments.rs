use crate::ipc::error::{err, ok};
use crate::ipc::handlers::{get_required_str, require_store, store_err};
use crate::ipc::types::{AppState, Request};
use crate::models::{Course, Student};
use crate::stats;
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.enrollments() {
        Ok(rows) => ok(&req.id, json!({ "enrollments": rows })),
        Err(e) => store_err(&req.id, e),
    }
}

/// The capacity precondition lives HERE, not in the store: the store's
/// enroll is permissive by contract and will exceed capacity if called
/// directly. This handler is the caller that checks first.
fn handle_enroll(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let course_id = match get_required_str(&req.params, "courseId", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let student_id = match get_required_str(&req.params, "studentId", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let courses = match store.list::<Course>() {
        Ok(c) => c,
        Err(e) => return store_err(&req.id, e),
    };
    let Some(course) = courses.iter().find(|c| c.id == course_id) else {
        return err(&req.id, "not_found", "course not found", None);
    };
    let students = match store.list::<Student>() {
        Ok(s) => s,
        Err(e) => return store_err(&req.id, e),
    };
    if !students.iter().any(|s| s.id == student_id) {
        return err(&req.id, "not_found", "student not found", None);
    }

    let enrollments = match store.enrollments() {
        Ok(rows) => rows,
        Err(e) => return store_err(&req.id, e),
    };
    let already_enrolled = enrollments
        .iter()
        .any(|e| e.course_id == course_id && e.student_id == student_id);

    let view = stats::course_capacity(course, &enrollments);
    if view.is_full && !already_enrolled {
        return err(
            &req.id,
            "capacity_full",
            format!("{} is at capacity", course.title),
            Some(json!({
                "courseId": course_id,
                "enrolledCount": view.enrolled_count,
                "capacity": course.capacity,
            })),
        );
    }

    match store.enroll(&course_id, &student_id) {
        Ok(()) => ok(
            &req.id,
            json!({
                "courseId": course_id,
                "studentId": student_id,
                "alreadyEnrolled": already_enrolled,
            }),
        ),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_unenroll(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let course_id = match get_required_str(&req.params, "courseId", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let student_id = match get_required_str(&req.params, "studentId", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match store.unenroll(&course_id, &student_id) {
        Ok(()) => ok(
            &req.id,
            json!({ "courseId": course_id, "studentId": student_id }),
        ),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "enrollments.list" => Some(handle_list(state, req)),
        "enrollments.enroll" => Some(handle_enroll(state, req)),
        "enrollments.unenroll" => Some(handle_unenroll(state, req)),
        _ => None,
    }
}
