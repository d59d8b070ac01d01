use crate::ipc::error::{err, ok};
use crate::ipc::handlers::students::fresh_id;
use crate::ipc::handlers::{get_required_str, require_store, store_err};
use crate::ipc::types::{AppState, Request};
use crate::models::Teacher;
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.list::<Teacher>() {
        Ok(teachers) => ok(&req.id, json!({ "teachers": teachers })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let Some(mut raw) = req.params.get("teacher").cloned() else {
        return err(&req.id, "bad_params", "missing params.teacher", None);
    };
    if let Some(obj) = raw.as_object_mut() {
        obj.entry("id").or_insert_with(|| json!(""));
    }
    let mut teacher: Teacher = match serde_json::from_value(raw) {
        Ok(t) => t,
        Err(e) => return err(&req.id, "bad_params", format!("invalid teacher: {}", e), None),
    };

    if teacher.experience < 0.0 {
        return err(&req.id, "bad_params", "experience must be >= 0", None);
    }

    if teacher.id.is_empty() {
        let existing = match store.list::<Teacher>() {
            Ok(t) => t,
            Err(e) => return store_err(&req.id, e),
        };
        let taken: Vec<String> = existing.into_iter().map(|t| t.id).collect();
        teacher.id = fresh_id("T", 2000, 9000, &taken);
    }

    // Renaming a teacher intentionally does NOT rewrite the denormalized
    // teacherName on existing courses.
    match store.save(&teacher) {
        Ok(()) => ok(&req.id, json!({ "teacher": teacher })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let teacher_id = match get_required_str(&req.params, "teacherId", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match store.delete_teacher(&teacher_id) {
        Ok(true) => ok(&req.id, json!({ "teacherId": teacher_id })),
        Ok(false) => err(&req.id, "not_found", "teacher not found", None),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "teachers.list" => Some(handle_list(state, req)),
        "teachers.save" => Some(handle_save(state, req)),
        "teachers.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
