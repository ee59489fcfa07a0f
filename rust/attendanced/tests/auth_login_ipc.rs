use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar(args: &[&str]) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_attendanced");
    let mut child = Command::new(exe)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn attendanced");
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

fn error_code(value: &serde_json::Value) -> &str {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

#[test]
fn login_sets_session_and_role_sections() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&["--seed-days", "0"]);

    let who = request_ok(&mut stdin, &mut reader, "1", "auth.whoAmI", json!({}));
    assert!(who["user"].is_null());
    assert_eq!(who["sections"], json!([]));

    let login = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "auth.login",
        json!({ "username": "student" }),
    );
    assert_eq!(login["user"]["id"], "u3");
    assert_eq!(login["user"]["role"], "STUDENT");
    assert_eq!(login["user"]["fullName"], "Michael Key");
    assert_eq!(login["sections"], json!(["dashboard", "reports"]));

    let who = request_ok(&mut stdin, &mut reader, "3", "auth.whoAmI", json!({}));
    assert_eq!(who["user"]["username"], "student");

    let _ = request_ok(&mut stdin, &mut reader, "4", "auth.logout", json!({}));
    let who = request_ok(&mut stdin, &mut reader, "5", "auth.whoAmI", json!({}));
    assert!(who["user"].is_null());

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn unknown_username_is_not_found_with_demo_hint() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&["--seed-days", "0"]);

    let resp = request(&mut stdin, &mut reader, "1", "auth.login", json!({ "username": "bob" }));
    assert_eq!(resp["ok"], false);
    assert!(resp.get("result").is_none());
    assert_eq!(error_code(&resp), "not_found");
    let message = resp["error"]["message"].as_str().unwrap_or("");
    for name in ["admin", "teacher", "student"] {
        assert!(message.contains(name), "{}", message);
    }
    assert_eq!(
        resp["error"]["details"]["acceptedUsernames"],
        json!(["admin", "teacher", "student"])
    );

    let missing = request(&mut stdin, &mut reader, "2", "auth.login", json!({}));
    assert_eq!(error_code(&missing), "bad_params");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn students_by_teacher_rejects_unknown_teacher() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&["--seed-days", "0"]);

    let mine = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.byTeacher",
        json!({ "teacherId": "u2" }),
    );
    let students = mine["students"].as_array().expect("students");
    assert_eq!(students.len(), 8);
    assert_eq!(students[0]["rollNo"], "101");
    assert_eq!(students[0]["teacherId"], "u2");

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "students.byTeacher",
        json!({ "teacherId": "u404" }),
    );
    assert_eq!(error_code(&resp), "not_found");

    drop(stdin);
    let _ = child.wait();
}
