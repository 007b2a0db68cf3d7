//! Integration tests for the `passdeck` CLI binary.
//!
//! Argument parsing, offline template tooling and error exits run without
//! a backend; the remaining tests talk to a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `passdeck` binary with env isolation.
///
/// Clears all `PASSDECK_*` env vars and points config lookups at a path
/// inside `dir` so tests never touch the user's real configuration.
fn passdeck_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("passdeck");
    cmd.env("HOME", "/tmp/passdeck-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/passdeck-cli-test-nonexistent")
        .env("PASSDECK_CONFIG", dir.join("config.toml"))
        .env_remove("PASSDECK_PROFILE")
        .env_remove("PASSDECK_URL")
        .env_remove("PASSDECK_EMAIL")
        .env_remove("PASSDECK_PASSWORD")
        .env_remove("PASSDECK_TOKEN")
        .env_remove("PASSDECK_OUTPUT")
        .env_remove("PASSDECK_INSECURE")
        .env_remove("PASSDECK_TIMEOUT")
        .env_remove("PASSDECK_LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_template(dir: &Path, body: &serde_json::Value) -> std::path::PathBuf {
    let file = dir.join("template.json");
    std::fs::write(&file, serde_json::to_vec_pretty(body).unwrap()).unwrap();
    file
}

fn member_card() -> serde_json::Value {
    json!({
        "name": "Gold Member",
        "pass_type": "storeCard",
        "appearance": { "background_color": "#1e3a8a", "foreground_color": "#ffffff" },
        "fields": {
            "header": [{ "key": "tier", "label": "Tier", "value": "Gold" }],
            "primary": [{ "key": "points", "label": "Points", "value": "120", "type": "number" }]
        }
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = passdeck_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let dir = tempfile::tempdir().unwrap();
    passdeck_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("wallet pass")
            .and(predicate::str::contains("templates"))
            .and(predicate::str::contains("passes"))
            .and(predicate::str::contains("customers")),
    );
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    passdeck_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("passdeck"));
}

#[test]
fn test_invalid_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    let output = passdeck_cmd(dir.path()).arg("frobnicate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    passdeck_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let dir = tempfile::tempdir().unwrap();
    passdeck_cmd(dir.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Offline tooling ─────────────────────────────────────────────────

#[test]
fn test_colors_contrast_plain() {
    let dir = tempfile::tempdir().unwrap();
    passdeck_cmd(dir.path())
        .args(["colors", "contrast", "#ffffff", "#3b82f6", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("#ffffff #000000")
                .and(predicate::str::contains("#3b82f6 #ffffff")),
        );
}

#[test]
fn test_colors_contrast_rejects_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let output = passdeck_cmd(dir.path())
        .args(["colors", "contrast", "navy"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_validate_accepts_complete_template() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_template(dir.path(), &member_card());
    passdeck_cmd(dir.path())
        .args(["templates", "validate"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_validate_reports_every_problem() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_template(
        dir.path(),
        &json!({
            "name": "GM",
            "appearance": { "background_color": "blue" },
            "fields": { "back": [{ "key": "terms", "label": "", "value": "" }] }
        }),
    );
    let output = passdeck_cmd(dir.path())
        .args(["templates", "validate"])
        .arg(&file)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("at least 3 characters"), "{text}");
    assert!(text.contains("valid hex color"), "{text}");
    assert!(text.contains("primary field is required"), "{text}");
}

#[test]
fn test_validate_lenient_ignores_designer_rules() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_template(
        dir.path(),
        &json!({ "name": "GM", "appearance": { "background_color": "blue" } }),
    );
    passdeck_cmd(dir.path())
        .args(["templates", "validate", "--policy", "lenient"])
        .arg(&file)
        .assert()
        .success();
}

#[test]
fn test_preview_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_template(dir.path(), &member_card());
    passdeck_cmd(dir.path())
        .args(["templates", "preview", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Gold Member")
                .and(predicate::str::contains("badge text #ffffff"))
                .and(predicate::str::contains("Points: 120")),
        );
}

#[test]
fn test_preview_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_template(dir.path(), &member_card());
    let output = passdeck_cmd(dir.path())
        .args(["templates", "preview", "-o", "json", "--file"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let preview: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(preview["badge_text_color"], "#ffffff");
    assert_eq!(preview["fields"].as_array().unwrap().len(), 2);
}

#[test]
fn test_templates_list_help_explains_archived_flag() {
    let dir = tempfile::tempdir().unwrap();
    let output = passdeck_cmd(dir.path())
        .args(["templates", "list", "--help"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    assert!(
        text.contains("listing already excludes archived templates"),
        "{text}"
    );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_override() {
    let dir = tempfile::tempdir().unwrap();
    passdeck_cmd(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_then_profiles() {
    let dir = tempfile::tempdir().unwrap();
    passdeck_cmd(dir.path())
        .args(["config", "set", "api_url", "http://localhost:8000"])
        .assert()
        .success();
    passdeck_cmd(dir.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *"));
}

#[test]
fn test_config_use_unknown_profile() {
    let dir = tempfile::tempdir().unwrap();
    let output = passdeck_cmd(dir.path())
        .args(["config", "use", "staging"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

// ── Backend commands ────────────────────────────────────────────────

#[test]
fn test_backend_command_without_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = passdeck_cmd(dir.path())
        .args(["templates", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("config init"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_templates_list_against_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "email": "owner@example.com",
            "full_name": "Owner",
            "is_active": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/templates/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "t-1",
            "name": "Coffee Club",
            "pass_type": "storeCard",
            "background_color": "#1E40AF",
            "header_fields": [],
            "primary_fields": [{ "key": "points", "label": "Points", "value": "0" }],
            "secondary_fields": [],
            "auxiliary_fields": [],
            "back_fields": [],
            "is_active": true,
            "is_archived": false
        }])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = passdeck_cmd(dir.path());
    cmd.env("PASSDECK_TOKEN", "tok-123")
        .args(["templates", "list", "-o", "plain", "--url", &server.uri()]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    let text = combined_output(&output);
    assert!(output.status.success(), "{text}");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "t-1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_template_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "email": "owner@example.com",
            "is_active": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/templates/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Template not found" })),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = passdeck_cmd(dir.path());
    cmd.env("PASSDECK_TOKEN", "tok-123")
        .args(["templates", "get", "missing", "--url", &server.uri()]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("templates list"));
}
