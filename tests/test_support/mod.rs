#![allow(dead_code)]

use rusqlite::Connection;
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

pub struct Sidecar {
    pub child: Child,
    pub stdin: ChildStdin,
    pub reader: BufReader<ChildStdout>,
}

impl Drop for Sidecar {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_sidecar() -> Sidecar {
    spawn_sidecar_with_env(&[])
}

pub fn spawn_sidecar_with_env(env: &[(&str, &str)]) -> Sidecar {
    let exe = env!("CARGO_BIN_EXE_weekviewd");
    let mut cmd = Command::new(exe);
    cmd.env_remove("WEEKVIEWD_DB")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    for (k, v) in env {
        cmd.env(k, v);
    }
    let mut child = cmd.spawn().expect("spawn weekviewd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    Sidecar {
        child,
        stdin,
        reader: BufReader::new(stdout),
    }
}

pub fn send_line(sidecar: &mut Sidecar, line: &str) -> serde_json::Value {
    writeln!(sidecar.stdin, "{}", line).expect("write request");
    sidecar.stdin.flush().expect("flush request");

    let mut out = String::new();
    sidecar
        .reader
        .read_line(&mut out)
        .expect("read response line");
    assert!(!out.trim().is_empty(), "empty response for {}", line);
    serde_json::from_str(out.trim()).expect("parse response json")
}

pub fn request(
    sidecar: &mut Sidecar,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    let value = send_line(sidecar, &payload.to_string());
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

pub fn request_ok(
    sidecar: &mut Sidecar,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(sidecar, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or(serde_json::Value::Null)
}

pub fn error_code(resp: &serde_json::Value) -> Option<&str> {
    resp.get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
}

/// Writes a schedule store in the layout the viewer reads.
pub fn seed_store(dir: &Path, rows: &[(&str, &str, &str)]) -> PathBuf {
    let path = dir.join("schedule.db");
    let conn = Connection::open(&path).expect("create store");
    conn.execute(
        "CREATE TABLE IF NOT EXISTS assignments(
            anesthesiologist TEXT,
            date TEXT,
            assignment TEXT
        )",
        [],
    )
    .expect("create assignments");
    for (person, date, text) in rows {
        conn.execute(
            "INSERT INTO assignments(anesthesiologist, date, assignment) VALUES(?, ?, ?)",
            (person, date, text),
        )
        .expect("insert assignment");
    }
    path
}

pub fn cells(row: &serde_json::Value) -> Vec<String> {
    row.get("cells")
        .and_then(|v| v.as_array())
        .expect("cells")
        .iter()
        .map(|c| c.as_str().expect("cell text").to_string())
        .collect()
}
