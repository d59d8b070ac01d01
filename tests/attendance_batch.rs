use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_edupulsed");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn edupulsed");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn records_for_date(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    date: &str,
) -> Vec<serde_json::Value> {
    request_ok(
        stdin,
        reader,
        id,
        "attendance.getForDate",
        json!({ "date": date }),
    )
    .get("records")
    .and_then(|v| v.as_array())
    .cloned()
    .expect("records array")
}

#[test]
fn save_batch_replaces_all_records_for_the_date() {
    let workspace = temp_dir("edupulse-attendance-replace");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.saveBatch",
        json!({ "records": [
            { "studentId": "S1001", "date": "2024-01-10", "status": "P" },
            { "studentId": "S1002", "date": "2024-01-10", "status": "A" }
        ]}),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.saveBatch",
        json!({ "records": [
            { "studentId": "S1003", "date": "2024-01-11", "status": "L" }
        ]}),
    );
    assert_eq!(records_for_date(&mut stdin, &mut reader, "4", "2024-01-10").len(), 2);

    // Second batch for the same date fully replaces the first; the omitted
    // student's record is gone.
    let saved = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "attendance.saveBatch",
        json!({ "records": [
            { "studentId": "S1002", "date": "2024-01-10", "status": "P" }
        ]}),
    );
    assert_eq!(saved.get("saved").and_then(|v| v.as_u64()), Some(1));

    let day = records_for_date(&mut stdin, &mut reader, "6", "2024-01-10");
    assert_eq!(day.len(), 1);
    assert_eq!(
        day[0].get("studentId").and_then(|v| v.as_str()),
        Some("S1002")
    );
    assert_eq!(day[0].get("status").and_then(|v| v.as_str()), Some("P"));

    // The other date is untouched.
    assert_eq!(records_for_date(&mut stdin, &mut reader, "7", "2024-01-11").len(), 1);
}

#[test]
fn empty_batch_is_a_noop_and_mixed_dates_are_rejected() {
    let workspace = temp_dir("edupulse-attendance-validation");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let saved = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.saveBatch",
        json!({ "records": [] }),
    );
    assert_eq!(saved.get("saved").and_then(|v| v.as_u64()), Some(0));

    let mixed = request(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.saveBatch",
        json!({ "records": [
            { "studentId": "S1001", "date": "2024-01-10", "status": "P" },
            { "studentId": "S1002", "date": "2024-01-11", "status": "P" }
        ]}),
    );
    assert_eq!(
        mixed
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("bad_params")
    );

    let bad_date = request(
        &mut stdin,
        &mut reader,
        "4",
        "attendance.saveBatch",
        json!({ "records": [
            { "studentId": "S1001", "date": "01/10/2024", "status": "P" }
        ]}),
    );
    assert_eq!(
        bad_date
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("bad_params")
    );

    let bad_status = request(
        &mut stdin,
        &mut reader,
        "5",
        "attendance.saveBatch",
        json!({ "records": [
            { "studentId": "S1001", "date": "2024-01-10", "status": "X" }
        ]}),
    );
    assert_eq!(
        bad_status
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("bad_params")
    );

    assert!(records_for_date(&mut stdin, &mut reader, "6", "2024-01-10").is_empty());
}
