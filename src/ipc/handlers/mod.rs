pub mod analytics;
pub mod assistant;
pub mod attendance;
pub mod core;
pub mod courses;
pub mod enrollments;
pub mod students;
pub mod teachers;

use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use crate::store::SchoolStore;

/// Every family except core needs a selected workspace.
pub(crate) fn require_store<'a>(
    state: &'a AppState,
    req: &Request,
) -> Result<&'a SchoolStore, serde_json::Value> {
    state
        .store
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}

pub(crate) fn get_required_str(
    params: &serde_json::Value,
    key: &str,
    req_id: &str,
) -> Result<String, serde_json::Value> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| err(req_id, "bad_params", format!("missing {}", key), None))
}

pub(crate) fn store_err(req_id: &str, e: anyhow::Error) -> serde_json::Value {
    err(req_id, "store_error", format!("{e:#}"), None)
}
