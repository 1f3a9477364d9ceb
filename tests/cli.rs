use assert_cmd::Command;
use std::path::PathBuf;

fn study_table() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/tma_p53_spots.csv")
}

#[test]
fn cli_help_smoke() {
    let mut cmd = Command::cargo_bin("tma-statistics").unwrap();
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn cli_validate_reports_counts() {
    let mut cmd = Command::cargo_bin("tma-statistics").unwrap();
    cmd.arg("validate").arg("--input").arg(study_table());
    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("spots: 156"));
    assert!(stdout.contains("cases: 40"));
}

#[test]
fn cli_report_writes_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("tma-statistics").unwrap();
    cmd.arg("report")
        .arg("--input")
        .arg(study_table())
        .arg("--out")
        .arg(dir.path())
        .arg("--json")
        .arg("--tsv");
    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("Wilcoxon signed-rank"));

    assert!(dir.path().join("report.json").exists());
    assert!(dir.path().join("descriptives.tsv").exists());
}
