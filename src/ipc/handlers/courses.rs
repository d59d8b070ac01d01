use crate::ipc::error::{err, ok};
use crate::ipc::handlers::students::fresh_id;
use crate::ipc::handlers::{get_required_str, require_store, store_err};
use crate::ipc::types::{AppState, Request};
use crate::models::Course;
use crate::stats;
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.list::<Course>() {
        Ok(courses) => ok(&req.id, json!({ "courses": courses })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let Some(mut raw) = req.params.get("course").cloned() else {
        return err(&req.id, "bad_params", "missing params.course", None);
    };
    if let Some(obj) = raw.as_object_mut() {
        obj.entry("id").or_insert_with(|| json!(""));
    }
    let mut course: Course = match serde_json::from_value(raw) {
        Ok(c) => c,
        Err(e) => return err(&req.id, "bad_params", format!("invalid course: {}", e), None),
    };

    if course.capacity == 0 {
        return err(&req.id, "bad_params", "capacity must be positive", None);
    }
    if course.credits < 0.0 {
        return err(&req.id, "bad_params", "credits must be >= 0", None);
    }

    if course.id.is_empty() {
        let existing = match store.list::<Course>() {
            Ok(c) => c,
            Err(e) => return store_err(&req.id, e),
        };
        let taken: Vec<String> = existing.into_iter().map(|c| c.id).collect();
        course.id = fresh_id("C", 300, 600, &taken);
    }

    match store.save(&course) {
        Ok(()) => ok(&req.id, json!({ "course": course })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let course_id = match get_required_str(&req.params, "courseId", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match store.delete_course(&course_id) {
        Ok((true, dropped)) => ok(
            &req.id,
            json!({ "courseId": course_id, "enrollmentsRemoved": dropped }),
        ),
        Ok((false, _)) => err(&req.id, "not_found", "course not found", None),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_capacity(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let course_id = match get_required_str(&req.params, "courseId", &req.id) {
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
    let enrollments = match store.enrollments() {
        Ok(rows) => rows,
        Err(e) => return store_err(&req.id, e),
    };

    let view = stats::course_capacity(course, &enrollments);
    ok(
        &req.id,
        json!({ "courseId": course_id, "capacity": course.capacity, "view": view }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "courses.list" => Some(handle_list(state, req)),
        "courses.save" => Some(handle_save(state, req)),
        "courses.delete" => Some(handle_delete(state, req)),
        "courses.capacity" => Some(handle_capacity(state, req)),
        _ => None,
    }
}
