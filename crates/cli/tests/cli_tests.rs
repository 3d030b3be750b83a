use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_sheet(path: &Path, rows: &[&[&str]]) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

/// Command running in `dir` with no sheet settings inherited from the host.
fn emolabel(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("emolabel").unwrap();
    cmd.current_dir(dir)
        .env_remove("SPREADSHEET_ID")
        .env_remove("WORKSHEET_NAME")
        .env_remove("GOOGLE_APPLICATION_CREDENTIALS")
        .env_remove("EMOLABEL_SECRETS")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("emolabel").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Label driver-emotion video clips"));
}

#[test]
fn test_cli_submit_help() {
    let mut cmd = Command::cargo_bin("emolabel").unwrap();
    cmd.arg("submit").arg("--help").assert().success().stdout(predicate::str::contains("uncertain"));
}

#[test]
fn test_schema_defaults_without_templates() {
    let dir = tempfile::tempdir().unwrap();
    emolabel(dir.path())
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"video_id\""))
        .stdout(predicate::str::contains("\"rater_id\""))
        .stdout(predicate::str::contains("\"timestamp_utc\""));
}

#[test]
fn test_schema_from_templates() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(
        &dir.path().join("Example_of_Video_Labelling.xlsx"),
        &[&["Video_Name", "Emotion", "Video ID"], &["a.mp4", "Happy", "a"]],
    );
    write_sheet(
        &dir.path().join("feats.xlsx"),
        &[&["", "Emotion", "Calm"], &["", "", "Angry"], &["", "Video_Name", "x"]],
    );

    let output = emolabel(dir.path()).args(["schema", "--features", "feats.xlsx"]).output().unwrap();
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["columns"], serde_json::json!(["video_id", "Emotion"]));
    assert_eq!(schema["choices"]["Emotion"], serde_json::json!(["Calm", "Angry"]));
    assert!(schema["choices"].get("Video_Name").is_none());
}

#[test]
fn test_sync_without_spreadsheet_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    emolabel(dir.path())
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SPREADSHEET_ID"));
}

#[test]
fn test_sync_without_credentials_fails() {
    let dir = tempfile::tempdir().unwrap();
    emolabel(dir.path())
        .args(["sync", "--spreadsheet-id", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("service account"));
}

#[test]
fn test_submit_rejects_empty_video_id() {
    let dir = tempfile::tempdir().unwrap();
    emolabel(dir.path())
        .args(["submit", "--set", "notes=dark"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("video_id"));
}

#[test]
fn test_submit_rejects_unknown_column() {
    let dir = tempfile::tempdir().unwrap();
    emolabel(dir.path())
        .args(["submit", "--set", "video_id=a", "--set", "Mood=happy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mood"));
}
