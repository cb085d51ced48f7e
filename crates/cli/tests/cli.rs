//! End-to-end tests driving the `hookwright` binary

#![allow(clippy::unwrap_used, clippy::panic)]

use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const TEMPLATE: &str = r#"{
  "permissions": {
    "allow": ["Bash(git status)"]
  },
  "hooks": {
    "PreToolUse": [
      {
        "matcher": "Bash",
        "hooks": [{ "type": "command", "command": "$CLAUDE_CONFIG_DIR/scripts/guard.py" }]
      }
    ]
  },
  "model": "opus"
}
"#;

struct Fixture {
    tmp: TempDir,
    source: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        fs::create_dir_all(source.join("scripts")).unwrap();
        fs::create_dir_all(source.join("rules")).unwrap();
        fs::create_dir_all(source.join(".claude/skills/verify")).unwrap();
        fs::write(source.join("CLAUDE.md"), "# Docs\n").unwrap();
        fs::write(source.join("scripts/guard.py"), "#!/usr/bin/env python3\n").unwrap();
        fs::write(source.join("settings.template.json"), TEMPLATE).unwrap();

        // Resolved paths embed the canonical source root
        let source = source.canonicalize().unwrap();
        Self { tmp, source }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.tmp.path().join(name)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hookwright"));
        cmd.env_remove("HOOKWRIGHT_SOURCE_DIR")
            .env_remove("HOOKWRIGHT_CONFIG")
            .env_remove("HOOKWRIGHT_LOG_FILE")
            .env_remove("RUST_LOG")
            .arg("--source")
            .arg(&self.source);
        cmd
    }
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_resolve_prints_resolved_json() {
    let fx = Fixture::new();

    let stdout = stdout_of(fx.command().arg("resolve"));

    let value: Value = serde_json::from_str(&stdout).unwrap();
    let command = value["hooks"]["PreToolUse"][0]["hooks"][0]["command"]
        .as_str()
        .unwrap();
    assert!(!stdout.contains("$CLAUDE_CONFIG_DIR"));
    assert!(command.starts_with(&fx.source.display().to_string()));
    assert_eq!(value["model"], "opus");
}

#[test]
fn test_resolve_to_output_file() {
    let fx = Fixture::new();
    let output = fx.path("resolved.json");

    fx.command()
        .arg("resolve")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let value = read_json(&output);
    assert!(!value.to_string().contains("$CLAUDE_CONFIG_DIR"));
    assert!(value["permissions"]["allow"].is_array());
}

#[test]
fn test_resolve_custom_template() {
    let fx = Fixture::new();
    let custom = fx.path("custom.json");
    fs::write(
        &custom,
        r#"{"hooks": {"PreToolUse": [{"matcher": "Edit", "hooks": [{"type": "command", "command": "$CLAUDE_CONFIG_DIR/custom.sh"}]}]}}"#,
    )
    .unwrap();

    let stdout = stdout_of(fx.command().arg("resolve").arg("--template").arg(&custom));

    let value: Value = serde_json::from_str(&stdout).unwrap();
    let command = value["hooks"]["PreToolUse"][0]["hooks"][0]["command"]
        .as_str()
        .unwrap();
    assert_eq!(command, fx.source.join("custom.sh").display().to_string());
}

#[test]
fn test_resolve_missing_template_fails() {
    let fx = Fixture::new();

    let output = fx
        .command()
        .arg("resolve")
        .arg("--template")
        .arg("/nonexistent/template.json")
        .assert()
        .failure()
        .get_output()
        .clone();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr).to_lowercase();
    assert!(stderr.contains("template"));
}

#[test]
fn test_resolve_is_idempotent() {
    let fx = Fixture::new();

    let first = stdout_of(fx.command().arg("resolve"));
    let second = stdout_of(fx.command().arg("resolve"));

    assert_eq!(first, second);
}

#[test]
fn test_validate_reports_success() {
    let fx = Fixture::new();

    let stdout = stdout_of(fx.command().arg("validate"));

    assert!(stdout.contains("valid"));
    assert!(stdout.contains("All 1 hook paths valid"));
}

#[test]
fn test_validate_fails_on_missing_script() {
    let fx = Fixture::new();
    fs::remove_file(fx.source.join("scripts/guard.py")).unwrap();

    let output = fx
        .command()
        .arg("validate")
        .assert()
        .failure()
        .get_output()
        .clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("guard.py"));
    assert!(stderr.contains("PreToolUse"));
}

#[test]
fn test_merge_preserves_local_settings() {
    let fx = Fixture::new();
    let target = fx.path("settings.json");
    fs::write(
        &target,
        r#"{"permissions": {"allow": ["Read"]}, "model": "sonnet", "theme": "dark"}"#,
    )
    .unwrap();

    fx.command()
        .arg("merge")
        .arg("--target")
        .arg(&target)
        .assert()
        .success();

    let value = read_json(&target);
    assert_eq!(value["model"], "sonnet");
    assert_eq!(value["theme"], "dark");
    assert_eq!(
        value["permissions"]["allow"],
        serde_json::json!(["Read", "Bash(git status)"])
    );

    let backups: Vec<_> = fs::read_dir(fx.tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("settings.json.backup."))
        .collect();
    assert_eq!(backups.len(), 1);
}

#[test]
fn test_merge_twice_is_stable() {
    let fx = Fixture::new();
    let target = fx.path("settings.json");

    fx.command().arg("merge").arg("--target").arg(&target).assert().success();
    let first = fs::read(&target).unwrap();
    fx.command().arg("merge").arg("--target").arg(&target).assert().success();

    assert_eq!(fs::read(&target).unwrap(), first);
}

#[test]
fn test_merge_malformed_target_fails_untouched() {
    let fx = Fixture::new();
    let target = fx.path("settings.json");
    fs::write(&target, "{ broken").unwrap();

    fx.command()
        .arg("merge")
        .arg("--target")
        .arg(&target)
        .assert()
        .failure();

    assert_eq!(fs::read_to_string(&target).unwrap(), "{ broken");
}

#[test]
fn test_merge_dry_run_writes_nothing() {
    let fx = Fixture::new();
    let target = fx.path("settings.json");

    let stdout = stdout_of(
        fx.command()
            .arg("merge")
            .arg("--dry-run")
            .arg("--target")
            .arg(&target),
    );

    let value: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["model"], "opus");
    assert!(!target.exists());
}

#[test]
fn test_merge_reports_missing_hook_commands_but_succeeds() {
    let fx = Fixture::new();
    fs::remove_file(fx.source.join("scripts/guard.py")).unwrap();
    let target = fx.path("settings.json");

    let output = fx
        .command()
        .arg("merge")
        .arg("--target")
        .arg(&target)
        .assert()
        .success()
        .get_output()
        .clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&fx.source.join("scripts/guard.py").display().to_string()));
    assert_eq!(read_json(&target)["model"], "opus");
}

#[test]
fn test_merge_skips_path_check_when_disabled() {
    let fx = Fixture::new();
    fs::remove_file(fx.source.join("scripts/guard.py")).unwrap();
    fs::write(
        fx.source.join(".hookwright.toml"),
        "[merge]\nvalidateAfterMerge = false\n",
    )
    .unwrap();
    let target = fx.path("settings.json");

    let output = fx
        .command()
        .arg("merge")
        .arg("--target")
        .arg(&target)
        .assert()
        .success()
        .get_output()
        .clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("guard.py"));
    assert!(target.exists());
}

#[cfg(unix)]
#[test]
fn test_symlink_creates_links_and_is_idempotent() {
    let fx = Fixture::new();
    let install = fx.path("install");

    fx.command()
        .arg("symlink")
        .arg("--install-dir")
        .arg(&install)
        .assert()
        .success();

    let link = install.join("skills/verify");
    assert_eq!(
        fs::read_link(&link).unwrap(),
        fx.source.join(".claude/skills/verify")
    );

    let stdout = stdout_of(fx.command().arg("symlink").arg("--install-dir").arg(&install));
    assert!(stdout.contains("All links up to date"));
}

#[cfg(unix)]
#[test]
fn test_symlink_conflict_fails_and_names_path() {
    let fx = Fixture::new();
    let install = fx.path("install");
    fs::create_dir_all(&install).unwrap();
    fs::write(install.join("CLAUDE.md"), "local").unwrap();

    let output = fx
        .command()
        .arg("symlink")
        .arg("--install-dir")
        .arg(&install)
        .assert()
        .failure()
        .get_output()
        .clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CLAUDE.md"));
    assert_eq!(fs::read_to_string(install.join("CLAUDE.md")).unwrap(), "local");
    assert!(install.join("rules").exists());
}
