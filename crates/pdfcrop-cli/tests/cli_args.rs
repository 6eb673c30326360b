use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("pdfcrop").unwrap()
}

#[test]
fn help_flag_prints_usage_with_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pdfcrop"));
}

#[test]
fn extract_subcommand_help() {
    cmd()
        .args(["extract", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FILE"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--max-total-crops"))
        .stdout(predicate::str::contains("--min-crop-edge-px"))
        .stdout(predicate::str::contains("--max-text-lines-per-block"))
        .stdout(predicate::str::contains("--pdfium-lib"));
}

#[test]
fn extract_help_shows_defaults() {
    cmd()
        .args(["extract", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: 36]"))
        .stdout(predicate::str::contains("[default: 2400]"))
        .stdout(predicate::str::contains("[default: 0.72]"));
}

#[test]
fn plan_subcommand_help() {
    cmd()
        .args(["plan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FILE"))
        .stdout(predicate::str::contains("--max-pages"));
}

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn extract_requires_file_argument() {
    cmd()
        .arg("extract")
        .assert()
        .failure()
        .stderr(predicate::str::contains("FILE"));
}

#[test]
fn extract_missing_file_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(["extract", "does-not-exist.pdf", "--output-dir"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn plan_missing_file_fails_with_message() {
    cmd()
        .args(["plan", "does-not-exist.pdf"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn inconsistent_options_are_rejected() {
    cmd()
        .args([
            "extract",
            "does-not-exist.pdf",
            "--min-crop-area-ratio",
            "0.9",
            "--max-crop-area-ratio",
            "0.5",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("min_crop_area_ratio"));
}

#[test]
fn non_numeric_flag_is_a_usage_error() {
    cmd()
        .args(["extract", "doc.pdf", "--max-pages", "many"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-pages"));
}
