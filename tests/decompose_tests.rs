use std::io::Write;
use std::process::{Command, Stdio};

#[test]
fn test_decompose_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = dir.path().join("tasks.json");
    std::fs::write(&tasks, r#"[{"id": "login", "title": "實作登入功能"}]"#).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_lumi"))
        .env("LUMI_DATA_DIR", dir.path().join("data"))
        .args(["decompose", "登入系統", "--tasks"])
        .arg(&tasks)
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("login"));

    let saved = std::fs::read_to_string(dir.path().join("data/tasks/login.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["status"], "todo");
    assert_eq!(saved["title"], "實作登入功能");
}

#[test]
fn test_decompose_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_lumi"))
        .env("LUMI_DATA_DIR", dir.path())
        .args(["decompose", "vision"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to execute binary");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"[{"title": "a"}, {"title": "b"}]"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let saved = std::fs::read_dir(dir.path().join("tasks")).unwrap().count();
    assert_eq!(saved, 2);
}

#[test]
fn test_decompose_rejects_non_array() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = dir.path().join("tasks.json");
    std::fs::write(&tasks, "{}").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_lumi"))
        .env("LUMI_DATA_DIR", dir.path())
        .args(["decompose", "vision", "--tasks"])
        .arg(&tasks)
        .output()
        .expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error: Tasks must be a JSON array"));
}
