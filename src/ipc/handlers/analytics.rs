use crate::ipc::error::ok;
use crate::ipc::handlers::{require_store, store_err};
use crate::ipc::types::{AppState, Request};
use crate::models::{Course, Student, Teacher};
use crate::stats;
use crate::store::SchoolStore;
use serde_json::json;

fn snapshot(
    store: &SchoolStore,
) -> anyhow::Result<(Vec<Student>, Vec<Teacher>, Vec<Course>)> {
    Ok((store.list()?, store.list()?, store.list()?))
}

fn handle_stats(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let (students, teachers, courses) = match snapshot(store) {
        Ok(v) => v,
        Err(e) => return store_err(&req.id, e),
    };
    let stats = stats::compute_stats(&students, &teachers, &courses);
    ok(&req.id, json!({ "stats": stats }))
}

fn handle_top_performers(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let limit = req
        .params
        .get("limit")
        .and_then(|v| v.as_u64())
        .unwrap_or(5) as usize;

    let students: Vec<Student> = match store.list() {
        Ok(s) => s,
        Err(e) => return store_err(&req.id, e),
    };
    let top = stats::top_performers(&students, limit);
    ok(&req.id, json!({ "students": top }))
}

fn handle_at_risk(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let students: Vec<Student> = match store.list() {
        Ok(s) => s,
        Err(e) => return store_err(&req.id, e),
    };
    let flagged = stats::at_risk(&students);
    ok(&req.id, json!({ "students": flagged }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "stats.get" => Some(handle_stats(state, req)),
        "analytics.topPerformers" => Some(handle_top_performers(state, req)),
        "analytics.atRisk" => Some(handle_at_risk(state, req)),
        _ => None,
    }
}
