// crates/mdr-cli/tests/template_commands.rs
// ============================================================================
// Module: CLI Template Command Tests
// Description: Integration tests for `mdr template check` and `render`.
// Purpose: Ensure template commands report syntax errors and emit JSON names.
// Dependencies: mdr-cli binary, serde_json, tempfile
// ============================================================================

//! CLI template command integration tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn mdr_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mdr"))
}

/// Runs `mdr` in an empty directory with no environment overrides.
fn run_mdr(dir: &Path, args: &[&str]) -> Output {
    Command::new(mdr_bin())
        .current_dir(dir)
        .env_remove("MDR_CONFIG")
        .env_remove("MDR_LOG")
        .args(args)
        .output()
        .expect("run mdr")
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_vec(value).expect("serialize")).expect("write json");
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

// ============================================================================
// SECTION: Check
// ============================================================================

#[test]
fn check_lists_placeholders() {
    let dir = TempDir::new().expect("temp dir");
    let output = run_mdr(dir.path(), &["template", "check", "Give [Drug] at [Dose]"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Template valid: 2 placeholder(s)."), "{stdout}");
    assert!(stdout.contains("[Drug] at 5..11"), "{stdout}");
    assert!(stdout.contains("[Dose] at 15..21"), "{stdout}");
    assert!(stdout.contains("Plain text: Give Drug at Dose"), "{stdout}");
}

#[test]
fn check_reports_syntax_errors_with_exit_code_one() {
    let dir = TempDir::new().expect("temp dir");
    let output = run_mdr(dir.path(), &["template", "check", "Give Drug]"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Template invalid"), "{stderr}");
    assert!(stderr.contains("unmatched `]` at 9"), "{stderr}");
}

#[test]
fn check_uses_the_configured_size_limit() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("mdr.toml"), "[templates]\nmax_template_bytes = 4\n")
        .expect("write config");
    let output = run_mdr(dir.path(), &["template", "check", "[Drug]"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exceeds size limit"), "{stderr}");
}

// ============================================================================
// SECTION: Render
// ============================================================================

#[test]
fn render_prints_name_and_plain_name() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("render.json");
    write_json(
        &input,
        &json!({
            "template": "Measure [Activity] at [Visit]",
            "entries": [
                {"name": "Activity", "conjunction": "and", "values": ["Weight", "Height"]},
                {"name": "Visit", "values": ["Day 1"]}
            ]
        }),
    );

    let output =
        run_mdr(dir.path(), &["template", "render", "--input", input.to_string_lossy().as_ref()]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let value = stdout_json(&output);
    assert_eq!(value["name"], "Measure [Weight and Height] at [Day 1]");
    assert_eq!(value["name_plain"], "Measure Weight and Height at Day 1");
}

#[test]
fn render_binds_each_occurrence_of_a_repeated_placeholder() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("render.json");
    write_json(
        &input,
        &json!({
            "template": "Give [Drug] then [Drug]",
            "entries": [
                {"name": "Drug", "values": ["Aspirin"]},
                {"name": "Drug", "values": ["Ibuprofen"]}
            ]
        }),
    );

    let output =
        run_mdr(dir.path(), &["template", "render", "--input", input.to_string_lossy().as_ref()]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let value = stdout_json(&output);
    assert_eq!(value["name"], "Give [Aspirin] then [Ibuprofen]");
    assert_eq!(value["name_plain"], "Give Aspirin then Ibuprofen");
}

#[test]
fn render_rejects_misaligned_entries() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("render.json");
    write_json(
        &input,
        &json!({
            "template": "Measure [Activity] at [Visit]",
            "entries": [
                {"name": "Visit", "values": ["Day 1"]},
                {"name": "Activity", "values": ["Weight"]}
            ]
        }),
    );

    let output =
        run_mdr(dir.path(), &["template", "render", "--input", input.to_string_lossy().as_ref()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to render template"), "{stderr}");
    assert!(stderr.contains("entry [Visit] does not match placeholder [Activity]"), "{stderr}");
}

#[test]
fn render_reports_malformed_input() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("render.json");
    fs::write(&input, "{\"template\": ").expect("write input");

    let output =
        run_mdr(dir.path(), &["template", "render", "--input", input.to_string_lossy().as_ref()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse render input"), "{stderr}");
}

#[test]
fn render_refuses_oversized_input() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("render.json");
    fs::write(&input, vec![b' '; 1024 * 1024 + 1]).expect("write input");

    let output =
        run_mdr(dir.path(), &["template", "render", "--input", input.to_string_lossy().as_ref()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Refusing to read render input"), "{stderr}");
}
