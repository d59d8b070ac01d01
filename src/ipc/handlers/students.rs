use crate::ipc::error::{err, ok};
use crate::ipc::handlers::{get_required_str, require_store, store_err};
use crate::ipc::types::{AppState, Request};
use crate::models::Student;
use serde_json::json;
use uuid::Uuid;

/// Mirror of the dashboard id scheme: a letter prefix plus digits drawn from
/// a fixed range, e.g. S1000-S9999.
pub(crate) fn fresh_id(prefix: &str, base: u32, span: u32, taken: &[String]) -> String {
    loop {
        let n = base + (Uuid::new_v4().as_u128() % span as u128) as u32;
        let candidate = format!("{}{}", prefix, n);
        if !taken.iter().any(|id| *id == candidate) {
            return candidate;
        }
    }
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.list::<Student>() {
        Ok(students) => ok(&req.id, json!({ "students": students })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let Some(raw) = req.params.get("student").cloned() else {
        return err(&req.id, "bad_params", "missing params.student", None);
    };
    let mut student: Student = match serde_json::from_value(patch_blank_id(raw)) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "bad_params", format!("invalid student: {}", e), None),
    };

    if !(0.0..=100.0).contains(&student.attendance) {
        return err(&req.id, "bad_params", "attendance must be 0-100", None);
    }
    if !(0.0..=100.0).contains(&student.performance_score) {
        return err(&req.id, "bad_params", "performanceScore must be 0-100", None);
    }

    if student.id.is_empty() {
        let existing = match store.list::<Student>() {
            Ok(s) => s,
            Err(e) => return store_err(&req.id, e),
        };
        let taken: Vec<String> = existing.into_iter().map(|s| s.id).collect();
        student.id = fresh_id("S", 1000, 9000, &taken);
    }
    if student.enrollment_date.is_empty() {
        student.enrollment_date = chrono::Local::now().date_naive().to_string();
    }

    match store.save(&student) {
        Ok(()) => ok(&req.id, json!({ "student": student })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let student_id = match get_required_str(&req.params, "studentId", &req.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match store.delete_student(&student_id) {
        Ok((true, dropped)) => ok(
            &req.id,
            json!({ "studentId": student_id, "enrollmentsRemoved": dropped }),
        ),
        Ok((false, _)) => err(&req.id, "not_found", "student not found", None),
        Err(e) => store_err(&req.id, e),
    }
}

/// Flattened tabular extract of the student roster, matching the dashboard's
/// download: same header row, every field quoted, percentages suffixed.
fn handle_export_csv(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let students = match store.list::<Student>() {
        Ok(s) => s,
        Err(e) => return store_err(&req.id, e),
    };

    let filter = |key: &str| -> Option<String> {
        req.params
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty() && *s != "All")
            .map(|s| s.to_string())
    };
    let search = filter("search").map(|s| s.to_lowercase());
    let grade = filter("grade");
    let status = filter("status");

    let selected: Vec<&Student> = students
        .iter()
        .filter(|s| {
            let matches_search = search.as_deref().map_or(true, |needle| {
                let full_name = format!("{} {}", s.first_name, s.last_name).to_lowercase();
                full_name.contains(needle) || s.id.to_lowercase().contains(needle)
            });
            let matches_grade = grade
                .as_deref()
                .map_or(true, |g| wire_name(&s.grade) == g);
            let matches_status = status
                .as_deref()
                .map_or(true, |st| wire_name(&s.status) == st);
            matches_search && matches_grade && matches_status
        })
        .collect();

    let mut csv = String::from(
        "ID,First Name,Last Name,Email,Grade,Class,Attendance,Performance,Status,Enrollment Date\n",
    );
    for s in &selected {
        let fields = [
            s.id.clone(),
            s.first_name.clone(),
            s.last_name.clone(),
            s.email.clone(),
            wire_name(&s.grade),
            s.class.clone(),
            format!("{}%", s.attendance),
            format!("{}%", s.performance_score),
            wire_name(&s.status),
            s.enrollment_date.clone(),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_quote(f)).collect();
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    let filename = format!(
        "EduPulse_Students_{}.csv",
        chrono::Local::now().date_naive()
    );
    ok(
        &req.id,
        json!({ "csv": csv, "filename": filename, "rowCount": selected.len() }),
    )
}

fn wire_name<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

fn csv_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Accept a record with a missing id and let the save assign one.
fn patch_blank_id(mut raw: serde_json::Value) -> serde_json::Value {
    if let Some(obj) = raw.as_object_mut() {
        obj.entry("id").or_insert_with(|| json!(""));
    }
    raw
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.save" => Some(handle_save(state, req)),
        "students.delete" => Some(handle_delete(state, req)),
        "students.exportCsv" => Some(handle_export_csv(state, req)),
        _ => None,
    }
}
