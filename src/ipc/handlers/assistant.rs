use crate::assistant;
use crate::ipc::error::{err, ok};
use crate::ipc::handlers::{get_required_str, require_store, store_err};
use crate::ipc::types::{AppState, Request};
use crate::models::Student;
use serde_json::json;

fn handle_context(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let students: Vec<Student> = match store.list() {
        Ok(s) => s,
        Err(e) => return store_err(&req.id, e),
    };
    let teachers = match store.list() {
        Ok(t) => t,
        Err(e) => return store_err(&req.id, e),
    };
    let courses = match store.list() {
        Ok(c) => c,
        Err(e) => return store_err(&req.id, e),
    };

    let context = assistant::build_context(&students, &teachers, &courses);
    let result = match req.params.get("query").and_then(|v| v.as_str()) {
        Some(query) => json!({
            "context": context,
            "prompt": assistant::assistant_prompt(query, &context),
            "fallback": assistant::ASSISTANT_FALLBACK,
        }),
        None => json!({ "context": context }),
    };
    ok(&req.id, result)
}

/// Prompt for the per-student analysis call. A deleted student answers
/// not_found; the client clears its selection rather than erroring out.
fn handle_performance_prompt(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let student_id = match get_required_str(&req.params, "studentId", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let students: Vec<Student> = match store.list() {
        Ok(s) => s,
        Err(e) => return store_err(&req.id, e),
    };
    let Some(student) = students.iter().find(|s| s.id == student_id) else {
        return err(&req.id, "not_found", "student not found", None);
    };

    ok(
        &req.id,
        json!({
            "studentId": student_id,
            "prompt": assistant::performance_prompt(student),
            "fallback": assistant::ANALYSIS_FALLBACK,
        }),
    )
}

fn handle_grading_prompt(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(resp) = require_store(state, req) {
        return resp;
    }
    let content = match get_required_str(&req.params, "content", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let rubric = match get_required_str(&req.params, "rubric", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let student_name = match get_required_str(&req.params, "studentName", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    ok(
        &req.id,
        json!({
            "prompt": assistant::grading_prompt(&content, &rubric, &student_name),
            "fallback": assistant::GRADING_FALLBACK,
        }),
    )
}

/// Validate the gateway's grade reply. Failures are recoverable: the error
/// carries the user-facing fallback message and nothing else changes.
fn handle_parse_grade(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(resp) = require_store(state, req) {
        return resp;
    }
    let raw = match get_required_str(&req.params, "response", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match assistant::parse_grade_response(&raw) {
        Ok(grade) => ok(&req.id, json!({ "grade": grade })),
        Err(gateway_err) => {
            let details = json!({ "fallback": gateway_err.fallback });
            err(
                &req.id,
                &gateway_err.code,
                gateway_err.message.clone(),
                Some(details),
            )
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "assistant.context" => Some(handle_context(state, req)),
        "assistant.performancePrompt" => Some(handle_performance_prompt(state, req)),
        "assistant.gradingPrompt" => Some(handle_grading_prompt(state, req)),
        "assistant.parseGrade" => Some(handle_parse_grade(state, req)),
        _ => None,
    }
}
