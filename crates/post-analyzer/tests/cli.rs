//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Write a single-page PDF showing `text`.
fn write_pdf(path: &Path, text: &str) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn stdout_json(output: &std::process::Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn no_arguments_prints_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn long_help_lists_environment_variables() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("POST_ANALYZER_OCR_LANGUAGE"));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_json_outputs_package_and_backends() {
    let output = cmd().args(["info", "--json"]).output().unwrap();
    let json = stdout_json(&output);

    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["backends"]["pdf"], true);
    assert!(json["backends"]["ocr"].is_boolean());
}

#[test]
fn info_text_shows_sections() {
    cmd()
        .args(["--color", "never", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration"))
        .stdout(predicate::str::contains("Backends"));
}

// =============================================================================
// Analyze Command
// =============================================================================

#[test]
fn analyze_json_reports_counts() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("post.txt");
    fs::write(&file, "Hello world.").unwrap();

    let output = cmd()
        .args(["analyze", "--json", file.to_str().unwrap()])
        .output()
        .unwrap();
    let json = stdout_json(&output);

    assert_eq!(json["word_count"], 2);
    assert_eq!(json["sentence_count"], 1);
    assert_eq!(json["avg_words_per_sentence"], 2);
    assert_eq!(
        json["suggestions"][0],
        "Post is short — consider adding more context or a question to increase engagement."
    );
}

#[test]
fn analyze_flags_links() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("post.txt");
    fs::write(&file, "Check this out https://example.com now").unwrap();

    cmd()
        .args(["--color", "never", "analyze", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Word count: 5"))
        .stdout(predicate::str::contains(
            "Contains links — add a short caption or CTA near the link.",
        ));
}

#[test]
fn analyze_threshold_override_clears_suggestions() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("post.txt");
    fs::write(&file, "Hello world.").unwrap();

    cmd()
        .args([
            "--color",
            "never",
            "analyze",
            "--min-words",
            "1",
            file.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No specific suggestions. Looks good!"));
}

#[test]
fn analyze_missing_file_fails() {
    cmd()
        .args(["analyze", "/definitely/not/here.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn analyze_respects_input_limit() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("post.txt");
    fs::write(&file, "word ".repeat(100)).unwrap();

    cmd()
        .args(["analyze", file.to_str().unwrap()])
        .env("POST_ANALYZER_MAX_INPUT_BYTES", "10")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

// =============================================================================
// Extract Command
// =============================================================================

#[test]
fn extract_without_file_fails() {
    cmd()
        .arg("extract")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no file selected"));
}

#[test]
fn extract_pdf_mode_rejects_text_file() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("notes.txt");
    fs::write(&file, "just some notes").unwrap();

    cmd()
        .args(["extract", "--mode", "pdf", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please upload a PDF file"));
}

#[test]
fn extract_image_mode_rejects_pdf() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("post.pdf");
    write_pdf(&file, "Hello World!");

    cmd()
        .args(["extract", "--mode", "image", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please upload an image file"));
}

#[test]
fn extract_pdf_json_includes_text_and_analysis() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("post.pdf");
    write_pdf(&file, "Hello World!");

    let output = cmd()
        .args(["extract", "--json", file.to_str().unwrap()])
        .output()
        .unwrap();
    let json = stdout_json(&output);

    assert_eq!(json["mode"], "pdf");
    assert!(json["text"].as_str().unwrap().contains("Hello World!"));
    assert_eq!(json["analysis"]["word_count"], 2);
    assert!(json.get("saved_to").is_none());
}

#[test]
fn extract_no_analysis_omits_report() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("post.pdf");
    write_pdf(&file, "Hello World!");

    let output = cmd()
        .args(["extract", "--json", "--no-analysis", file.to_str().unwrap()])
        .output()
        .unwrap();
    let json = stdout_json(&output);

    assert!(json.get("analysis").is_none());
}

#[test]
fn extract_text_output_shows_text_and_suggestions() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("post.pdf");
    write_pdf(&file, "Hello World!");

    cmd()
        .args(["--color", "never", "extract", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted Text"))
        .stdout(predicate::str::contains("Hello World!"))
        .stdout(predicate::str::contains("Post is short"));
}

#[test]
fn extract_save_writes_default_file() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("post.pdf");
    write_pdf(&file, "Hello World!");

    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "extract",
            "--save",
            "post.pdf",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to"));

    let saved = fs::read_to_string(tmp.path().join("extracted-text.txt")).unwrap();
    assert!(saved.contains("Hello World!"));
}

#[test]
fn extract_output_writes_given_path() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("post.pdf");
    let target = tmp.path().join("out.txt");
    write_pdf(&file, "Hello World!");

    let output = cmd()
        .args([
            "extract",
            "--json",
            "--output",
            target.to_str().unwrap(),
            file.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    let json = stdout_json(&output);

    assert_eq!(json["saved_to"], target.to_str().unwrap());
    assert!(fs::read_to_string(&target).unwrap().contains("Hello World!"));
}

#[test]
fn extract_corrupt_pdf_is_retryable_failure() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("broken.pdf");
    fs::write(&file, b"%PDF-1.5\nthis is not really a pdf").unwrap();

    cmd()
        .args(["extract", "--retries", "1", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse PDF"))
        .stderr(predicate::str::contains("--retries"));
}

#[test]
fn extract_blank_pdf_still_shows_analysis() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("scan.pdf");
    write_pdf(&file, "");

    cmd()
        .args(["--color", "never", "extract", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no text found)"))
        .stdout(predicate::str::contains("Word count: 0"))
        .stdout(predicate::str::contains("Post is short"));
}
