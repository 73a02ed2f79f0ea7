//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with `XPQUEST_HOME` pointed at a fresh
//! temporary directory and verify outputs.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_xpquest"))
        .args(args)
        .env("XPQUEST_HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &Path, args: &[&str]) -> (String, String) {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    (stdout, stderr)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout is not JSON")
}

/// A home with award debouncing disabled, since every call is a new process.
fn home() -> TempDir {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["config", "set", "engine.debounce_ms", "0"]);
    dir
}

fn write_themes(home: &Path) {
    std::fs::write(
        home.join("themes.json"),
        r##"[
            {"id": "default", "name": "Default", "cssVariables": {"--bg": "#fff"}, "background": "#fff"},
            {"id": "zen", "name": "Zen", "cssVariables": {"--bg": "#e8f0e8", "--accent": "#5a7"}, "background": "#e8f0e8", "cost": 50}
        ]"##,
    )
    .unwrap();
}

#[test]
fn test_status_on_fresh_home() {
    let home = home();
    let (stdout, _) = run_ok(home.path(), &["status"]);
    let status = json(&stdout);
    assert_eq!(status["totalXP"], 0);
    assert_eq!(status["levelName"], "Beginner");
    assert_eq!(status["activeTheme"], "default");
    assert_eq!(status["nextMilestone"], 50);
}

#[test]
fn test_award_reports_receipt_and_events() {
    let home = home();
    let (stdout, stderr) = run_ok(home.path(), &["award", "60", "--source", "lesson"]);
    let receipt = json(&stdout);
    assert_eq!(receipt["status"], "awarded");
    assert_eq!(receipt["new_total"], 60);
    assert_eq!(receipt["milestones"], serde_json::json!([50]));

    assert!(stderr.contains(r#"event: {"type":"Ready""#));
    assert!(stderr.contains(r#"event: {"type":"XpGained""#));
    assert!(stderr.contains(r#"event: {"type":"MilestoneCelebration""#));
    assert!(stderr.contains("notify: "));

    let (stdout, _) = run_ok(home.path(), &["status"]);
    assert_eq!(json(&stdout)["totalXP"], 60);
}

#[test]
fn test_challenge_awards_computed_xp() {
    let home = home();
    let (stdout, _) = run_ok(
        home.path(),
        &["challenge", "--time-spent", "30", "--progress", "--completed"],
    );
    let receipt = json(&stdout);
    assert_eq!(receipt["amount"], 1);
    assert_eq!(receipt["source"], "challenge");

    let (stdout, _) = run_ok(home.path(), &["challenge", "--time-spent", "1"]);
    assert_eq!(json(&stdout)["amount"], 0);
}

#[test]
fn test_achievements_and_levels_listing() {
    let home = home();
    run_ok(home.path(), &["award", "120"]);

    let (stdout, _) = run_ok(home.path(), &["achievements"]);
    let rows = json(&stdout);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 7);
    let century = rows.iter().find(|r| r["id"] == "century").unwrap();
    assert_eq!(century["unlocked"], true);
    let on_fire = rows.iter().find(|r| r["id"] == "on_fire").unwrap();
    assert_eq!(on_fire["unlocked"], false);

    let (stdout, _) = run_ok(home.path(), &["levels"]);
    let levels = json(&stdout);
    let current: Vec<&str> = levels
        .as_array()
        .unwrap()
        .iter()
        .filter(|l| l["current"] == true)
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(current, vec!["Apprentice"]);
}

#[test]
fn test_theme_purchase_flow() {
    let home = home();
    write_themes(home.path());

    let (stdout, stderr, code) = run_cli(home.path(), &["theme", "use", "zen"]);
    assert_ne!(code, 0, "locked theme activated: {stdout}");
    assert!(stderr.contains("error:"));

    let (stdout, _) = run_ok(home.path(), &["theme", "unlock", "zen"]);
    assert_eq!(json(&stdout)["status"], "insufficient_xp");

    run_ok(home.path(), &["award", "60"]);
    let (stdout, _) = run_ok(home.path(), &["theme", "unlock", "zen"]);
    let outcome = json(&stdout);
    assert_eq!(outcome["status"], "unlocked");
    assert_eq!(outcome["remaining_xp"], 10);

    run_ok(home.path(), &["theme", "use", "zen"]);
    let (stdout, _) = run_ok(home.path(), &["theme", "list"]);
    let themes = json(&stdout);
    let zen = themes
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == "zen")
        .unwrap();
    assert_eq!(zen["unlocked"], true);
    assert_eq!(zen["active"], true);

    let (css, _) = run_ok(home.path(), &["theme", "css", "zen"]);
    assert!(css.starts_with(":root {"));
    assert!(css.contains("--accent: #5a7;"));
}

#[test]
fn test_missing_catalog_degrades_to_empty() {
    let home = home();
    let (stdout, _) = run_ok(home.path(), &["theme", "list"]);
    assert_eq!(json(&stdout), serde_json::json!([]));
}

#[test]
fn test_history_is_newest_first() {
    let home = home();
    run_ok(home.path(), &["award", "5", "--source", "first"]);
    run_ok(home.path(), &["award", "7", "--source", "second"]);
    let (stdout, _) = run_ok(home.path(), &["history", "--limit", "1"]);
    let entries = json(&stdout);
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["source"], "second");
}

#[test]
fn test_reset_requires_confirmation() {
    let home = home();
    run_ok(home.path(), &["award", "40"]);

    let (_, stderr, code) = run_cli(home.path(), &["reset"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("--yes"));

    run_ok(home.path(), &["reset", "--yes"]);
    let (stdout, _) = run_ok(home.path(), &["status"]);
    assert_eq!(json(&stdout)["totalXP"], 0);
}

#[test]
fn test_config_get_set_path() {
    let home = home();
    let (stdout, _) = run_ok(home.path(), &["config", "get", "engine.debounce_ms"]);
    assert_eq!(stdout.trim(), "0");

    run_ok(home.path(), &["config", "set", "themes.source", "catalog.json"]);
    let (stdout, _) = run_ok(home.path(), &["config", "get", "themes.source"]);
    assert_eq!(stdout.trim(), "catalog.json");

    let (_, _, code) = run_cli(home.path(), &["config", "get", "no.such.key"]);
    assert_ne!(code, 0);

    let (stdout, _) = run_ok(home.path(), &["config", "path"]);
    assert!(stdout.trim().ends_with("config.toml"));
}
