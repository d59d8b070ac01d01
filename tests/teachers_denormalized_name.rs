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

#[test]
fn renaming_a_teacher_leaves_course_teacher_name_alone() {
    let workspace = temp_dir("edupulse-teacher-rename");
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
        "teachers.save",
        json!({ "teacher": {
            "id": "T2001",
            "name": "Dr. Sarah Reese",
            "subject": "Mathematics",
            "email": "s.connor@school.edu",
            "experience": 13,
            "assignedClasses": ["10-A", "11-A"],
            "status": "Available"
        }}),
    );

    let teachers = request_ok(&mut stdin, &mut reader, "3", "teachers.list", json!({}));
    let renamed = teachers
        .get("teachers")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .expect("first teacher");
    assert_eq!(
        renamed.get("name").and_then(|v| v.as_str()),
        Some("Dr. Sarah Reese")
    );

    // The course keeps the stale denormalized copy.
    let courses = request_ok(&mut stdin, &mut reader, "4", "courses.list", json!({}));
    let algebra = courses
        .get("courses")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .expect("first course");
    assert_eq!(
        algebra.get("teacherName").and_then(|v| v.as_str()),
        Some("Dr. Sarah Connor")
    );
}

#[test]
fn teacher_delete_and_auto_id_assignment() {
    let workspace = temp_dir("edupulse-teacher-crud");
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
        "teachers.save",
        json!({ "teacher": {
            "name": "Mr. Alan Turing",
            "subject": "Computer Science",
            "email": "a.turing@school.edu",
            "experience": 5,
            "assignedClasses": ["12-A"],
            "status": "Busy"
        }}),
    );
    let new_id = saved
        .get("teacher")
        .and_then(|t| t.get("id"))
        .and_then(|v| v.as_str())
        .expect("assigned id")
        .to_string();
    assert!(new_id.starts_with('T'));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "teachers.delete",
        json!({ "teacherId": new_id }),
    );
    let teachers = request_ok(&mut stdin, &mut reader, "4", "teachers.list", json!({}));
    assert_eq!(
        teachers
            .get("teachers")
            .and_then(|v| v.as_array())
            .map(|a| a.len()),
        Some(3)
    );

    let resp = request(
        &mut stdin,
        &mut reader,
        "5",
        "teachers.delete",
        json!({ "teacherId": "T9999" }),
    );
    assert_eq!(
        resp.get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("not_found")
    );

    let negative = request(
        &mut stdin,
        &mut reader,
        "6",
        "teachers.save",
        json!({ "teacher": {
            "id": "T2001",
            "name": "Dr. Sarah Connor",
            "subject": "Mathematics",
            "email": "s.connor@school.edu",
            "experience": -1,
            "assignedClasses": [],
            "status": "Available"
        }}),
    );
    assert_eq!(
        negative
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("bad_params")
    );
}
