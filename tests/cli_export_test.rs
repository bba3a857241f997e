mod common;

use common::{docx_with_entries, sample_document};
use ebdx::{ExtractorConfig, load_extraction};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn write_fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

/// Runs the binary with a default config written next to the fixture, so a
/// user config file cannot change the results.
fn run_ebdx(args: &[&str], file: &Path) -> std::process::Output {
    let config_path = file.with_file_name("config.toml");
    ExtractorConfig::default()
        .save_to(&config_path)
        .expect("write config");

    Command::new(env!("CARGO_BIN_EXE_ebdx"))
        .arg(file)
        .arg("--config")
        .arg(&config_path)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute ebdx")
}

#[tokio::test]
async fn test_load_extraction_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "ebd.docx", &sample_document().build_docx());

    let extraction = load_extraction(&path, &ExtractorConfig::default())
        .await
        .expect("Failed to load test document");
    assert_eq!(extraction.records.len(), 2);
}

#[tokio::test]
async fn test_load_extraction_rejects_other_extensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "ebd.xlsx", &sample_document().build_docx());

    let err = load_extraction(&path, &ExtractorConfig::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Excel"));
}

#[test]
fn test_json_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "ebd.docx", &sample_document().build_docx());

    let output = run_ebdx(&["--export", "json"], &path);
    assert!(
        output.status.success(),
        "ebdx should export JSON: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["records"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["records"][0]["role"], "MSB");
}

#[test]
fn test_markdown_export_with_role_filter() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "ebd.docx", &sample_document().build_docx());

    let output = run_ebdx(&["--export", "markdown", "--role", "lf"], &path);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("E\\_0402\\_Stornierung prüfen"));
    assert!(!stdout.contains("E\\_0401"));
    assert!(stdout.contains("| 010 | Ist die Stornierung fristgerecht? | nein | A99 |"));
}

#[test]
fn test_outline_and_search() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "ebd.docx", &sample_document().build_docx());

    let output = run_ebdx(&["--outline"], &path);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("E_0401_Prüfen, ob Anfrage vollständig ist [MSB] 3 steps"));

    let output = run_ebdx(&["--search", "vollmacht"], &path);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("Liegt eine Vollmacht vor?"));
}

#[test]
fn test_missing_document_body_fails() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = docx_with_entries(&[("xl/workbook.xml", b"<workbook/>".as_slice())]);
    let path = write_fixture(&dir, "broken.docx", &bytes);

    let output = run_ebdx(&[], &path);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File does not contain word/document.xml"), "{stderr}");
}
