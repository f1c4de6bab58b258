//! Integration tests for the liftgen binary.
//!
//! These tests verify end-to-end behavior including:
//! - Generating from AI responses and falling back to quick builds
//! - Saving, duplicating and deleting templates, and exporting them to CSV
//! - Validation of the muscle-group selection

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI command isolated from the user's real config file
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("liftgen"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"));
    cmd
}

const CHEST_RESPONSE: &str = "Barbell Bench Press - 4x6-8\nCable Fly - 3x12";

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Duration-balanced strength workout generator",
        ));
}

#[test]
fn test_generate_from_stdin() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["generate", "--groups", "chest", "--minutes", "30"])
        .write_stdin(CHEST_RESPONSE)
        .assert()
        .success()
        .stdout(predicate::str::contains("AI Generated Workout"))
        .stdout(predicate::str::contains("Barbell Bench Press"))
        .stdout(predicate::str::contains("quick build").not());
}

#[test]
fn test_generate_from_file_as_json() {
    let temp_dir = setup_test_dir();
    let input = temp_dir.path().join("response.txt");
    fs::write(
        &input,
        "```json\n{\"title\": \"Back Day\", \"exercises\": [{\"name\": \"Barbell Row\", \"sets\": 4, \"reps\": \"8\", \"rest\": 120}]}\n```",
    )
    .unwrap();

    let output = cli(&temp_dir)
        .args(["generate", "--groups", "back", "--minutes", "45", "--json"])
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let workout: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(workout["title"], "Back Day");
    assert_eq!(workout["source"]["kind"], "parsed");
    assert_eq!(workout["target_minutes"], 45);
    assert_eq!(workout["exercises"][0]["name"], "Barbell Row");

    let count = workout["exercises"].as_array().unwrap().len();
    assert!((5..=7).contains(&count), "got {} exercises", count);
}

#[test]
fn test_offline_uses_quick_build() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["generate", "--groups", "quads,glutes", "--minutes", "60", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Server unavailable, using quick build"))
        .stdout(predicate::str::contains("Quick Build"));
}

#[test]
fn test_unparseable_response_notice() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["generate", "--groups", "arms", "--minutes", "20"])
        .write_stdin("Sorry, I can't help with that right now.")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The AI response couldn't be parsed, using quick build",
        ));
}

#[test]
fn test_generate_requires_groups() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["generate", "--minutes", "30", "--offline"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pick at least one muscle group"));
}

#[test]
fn test_unknown_group_rejected() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["generate", "--groups", "neck", "--offline"])
        .assert()
        .failure();
}

#[test]
fn test_config_supplies_default_groups() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config/liftgen");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[generation]\nmuscle_groups = [\"core\"]\ndefault_duration_minutes = 20\n",
    )
    .unwrap();

    cli(&temp_dir)
        .args(["generate", "--offline", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"target_minutes\": 20"))
        .stdout(predicate::str::contains("Ab Wheel Rollout"));
}

#[test]
fn test_save_and_list_templates() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .arg("templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved templates"));

    cli(&temp_dir)
        .args(["generate", "--groups", "chest", "--minutes", "30", "--save"])
        .write_stdin(CHEST_RESPONSE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved template"));

    let store = temp_dir.path().join("data/templates.jsonl");
    let content = fs::read_to_string(&store).expect("Failed to read template store");
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("\"mode\":\"ai\""));

    cli(&temp_dir)
        .arg("templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("AI Generated Workout"))
        .stdout(predicate::str::contains("30 min"));
}

#[test]
fn test_export_templates_to_csv() {
    let temp_dir = setup_test_dir();

    for groups in ["back", "shoulders"] {
        cli(&temp_dir)
            .args(["generate", "--groups", groups, "--minutes", "20", "--offline", "--save"])
            .assert()
            .success();
    }

    let csv_path = temp_dir.path().join("exports/templates.csv");
    cli(&temp_dir)
        .arg("export")
        .arg("--output")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    let csv_content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(csv_content.starts_with("template_id,title"));
    assert!(csv_content.contains("Barbell Row"));
    assert!(csv_content.contains("Overhead Press"));
}

#[test]
fn test_export_with_nothing_saved() {
    let temp_dir = setup_test_dir();
    let csv_path = temp_dir.path().join("out.csv");

    cli(&temp_dir)
        .arg("export")
        .arg("--output")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to export"));
    assert!(!csv_path.exists());
}

#[test]
fn test_library_listing() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["library", "--group", "hamstrings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Romanian Deadlift"))
        .stdout(predicate::str::contains("Lying Leg Curl"))
        .stdout(predicate::str::contains("Back Squat").not());
}

#[test]
fn test_request_payload() {
    let temp_dir = setup_test_dir();

    let output = cli(&temp_dir)
        .args([
            "request",
            "--groups",
            "chest,back",
            "--minutes",
            "45",
            "--equipment",
            "barbell,cable",
            "--type",
            "hypertrophy",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let payload: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(payload["muscle_groups"], serde_json::json!(["chest", "back"]));
    assert_eq!(payload["equipment"], serde_json::json!(["barbell", "cable"]));
    assert_eq!(payload["workout_type"], "hypertrophy");
    assert_eq!(payload["duration_minutes"], 45);
}

/// Ids of the saved templates, in store order
fn saved_ids(temp_dir: &TempDir) -> Vec<String> {
    let store = temp_dir.path().join("data/templates.jsonl");
    fs::read_to_string(store)
        .unwrap_or_default()
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).expect("valid template");
            value["id"].as_str().expect("id").to_string()
        })
        .collect()
}

#[test]
fn test_duplicate_and_delete_templates() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["generate", "--groups", "chest", "--minutes", "30", "--save"])
        .write_stdin(CHEST_RESPONSE)
        .assert()
        .success();
    let original = saved_ids(&temp_dir).remove(0);

    cli(&temp_dir)
        .args(["templates", "duplicate", original.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("AI Generated Workout Copy"));

    cli(&temp_dir)
        .args(["templates", "duplicate", original.as_str(), "--title", "Chest B"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Chest B"));

    let ids = saved_ids(&temp_dir);
    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], original);

    cli(&temp_dir)
        .args(["templates", "delete", original.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted template"));

    let remaining = saved_ids(&temp_dir);
    assert_eq!(remaining, ids[1..].to_vec());

    cli(&temp_dir)
        .args(["templates", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chest B"))
        .stdout(predicate::str::contains(original.as_str()).not());
}

#[test]
fn test_delete_unknown_template_fails() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["templates", "delete", "7f1c3a52-2d4e-4c1b-9a8e-3b5f6d7e8f90"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TemplateNotFound"));

    cli(&temp_dir)
        .args(["templates", "delete", "not-a-uuid"])
        .assert()
        .failure();
}

#[test]
fn test_verbose_logs_to_stderr() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["-v", "generate", "--groups", "back", "--offline", "--json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Offline mode"))
        .stdout(predicate::str::contains("Offline mode").not());

    cli(&temp_dir)
        .args(["generate", "--groups", "back", "--offline"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Offline mode").not());
}

#[test]
fn test_data_dir_flag_overrides_config() {
    let temp_dir = setup_test_dir();
    let configured = temp_dir.path().join("configured");
    let config_dir = temp_dir.path().join("config/liftgen");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!("[data]\ndata_dir = {:?}\n", configured.display().to_string()),
    )
    .unwrap();

    cli(&temp_dir)
        .args(["generate", "--groups", "calves", "--minutes", "20", "--offline", "--save"])
        .assert()
        .success();

    assert!(temp_dir.path().join("data/templates.jsonl").exists());
    assert!(!configured.exists());
}
