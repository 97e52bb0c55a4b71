use std::fs;
use std::path::PathBuf;

use lumi_lib::config::Settings;
use lumi_lib::scan;
use lumi_lib::snapshot;

fn settings_for(root: PathBuf, out: &std::path::Path) -> Settings {
    Settings {
        port: 0,
        bind: "127.0.0.1".to_string(),
        web_dir: out.join("web"),
        data_dir: out.join("data"),
        snapshot_path: out.join("web").join("data.js"),
        workspace_root: root,
        max_depth: 3,
        cron_command: vec!["lumi-no-such-cron-command".to_string()],
    }
}

#[test]
fn test_scan_writes_snapshot_the_dashboard_can_read() {
    let workspace = tempfile::tempdir().unwrap();
    let root = workspace.path();
    fs::create_dir_all(root.join("projects/lumi/web")).unwrap();
    fs::write(
        root.join("projects/lumi/todo.md"),
        "## Phase 1\n- [x] 規劃架構\n- [ ] 實作登入功能\n## Phase 2\n- [ ] 撰寫文件\n",
    )
    .unwrap();
    fs::write(root.join("projects/lumi/web/app.js"), "console.log(1);").unwrap();
    fs::write(root.join("projects/lumi/web/logo.png"), [0u8; 4]).unwrap();
    fs::create_dir_all(root.join("projects/lumi/data")).unwrap();
    fs::write(root.join("projects/lumi/data/README.md"), "hidden project").unwrap();
    fs::create_dir_all(root.join("tools")).unwrap();
    fs::write(root.join("tools/package.json"), "{}").unwrap();

    let out = tempfile::tempdir().unwrap();
    let settings = settings_for(root.to_path_buf(), out.path());
    fs::create_dir_all(&settings.data_dir).unwrap();
    fs::write(
        settings.data_dir.join("dialogue.jsonl"),
        "{\"role\":\"assistant\",\"content\":\"早安\",\"timestamp\":\"2026-02-03T08:00:00\"}\n",
    )
    .unwrap();
    fs::write(settings.data_dir.join("thinking.lock"), "").unwrap();

    let report = scan::run(&settings).unwrap();
    assert_eq!(report.projects, 2);
    assert!(report.state_path.exists());
    assert!(report.script_path.exists());

    let loaded = snapshot::load(&settings.snapshot_path).unwrap();
    assert_eq!(
        loaded.projects.ids().collect::<Vec<_>>(),
        vec!["projects/lumi", "tools"]
    );
    assert!(loaded.is_thinking);
    assert_eq!(loaded.dialogue.len(), 1);
    assert!(loaded.cron_jobs.is_empty());
    assert!(loaded.last_scan.is_some());

    let lumi = loaded.projects.get("projects/lumi").unwrap();
    assert_eq!(lumi.status(), "active");
    assert_eq!(lumi.progress.as_deref(), Some("1/3"));
    assert_eq!(lumi.tasks[2].phase, "Phase 2");
    let files: Vec<&str> = lumi.files.iter().map(|f| f.rel_path.as_str()).collect();
    assert_eq!(files, vec!["data/README.md", "todo.md", "web/app.js"]);

    let tools = loaded.projects.get("tools").unwrap();
    assert_eq!(tools.status(), "stable");
    assert_eq!(tools.progress, None);
    assert!(tools.tasks.is_empty());
}

#[test]
fn test_scan_rejects_missing_root() {
    let out = tempfile::tempdir().unwrap();
    let settings = settings_for(out.path().join("nope"), out.path());
    let err = scan::run(&settings).unwrap_err();
    assert!(err.to_string().contains("not a directory"));
}
