use crate::ipc::error::{err, ok};
use crate::ipc::handlers::{get_required_str, require_store, store_err};
use crate::ipc::types::{AppState, Request};
use crate::models::AttendanceRecord;
use chrono::NaiveDate;
use serde_json::json;

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("date must be YYYY-MM-DD, got '{}'", raw))
}

fn handle_get_for_date(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let date = match get_required_str(&req.params, "date", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if let Err(msg) = parse_date(&date) {
        return err(&req.id, "bad_params", msg, None);
    }

    match store.attendance_for_date(&date) {
        Ok(records) => ok(&req.id, json!({ "date": date, "records": records })),
        Err(e) => store_err(&req.id, e),
    }
}

/// A batch is one date's complete roster: every record must carry the same
/// date, and the save replaces everything previously stored for that date.
fn handle_save_batch(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let Some(raw) = req.params.get("records").cloned() else {
        return err(&req.id, "bad_params", "missing params.records", None);
    };
    let records: Vec<AttendanceRecord> = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => return err(&req.id, "bad_params", format!("invalid records: {}", e), None),
    };

    let Some(first) = records.first() else {
        return ok(&req.id, json!({ "saved": 0 }));
    };
    if let Err(msg) = parse_date(&first.date) {
        return err(&req.id, "bad_params", msg, None);
    }
    if records.iter().any(|r| r.date != first.date) {
        return err(
            &req.id,
            "bad_params",
            "all records in a batch must share one date",
            None,
        );
    }

    match store.save_attendance_batch(&records) {
        Ok(()) => ok(
            &req.id,
            json!({ "date": first.date, "saved": records.len() }),
        ),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.getForDate" => Some(handle_get_for_date(state, req)),
        "attendance.saveBatch" => Some(handle_save_batch(state, req)),
        _ => None,
    }
}
