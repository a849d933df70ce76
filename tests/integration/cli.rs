//! The `subtol` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use subtol::RepresentationKind;

use crate::common::{file_for, ACGT_FILES, FIXTURE_PASSWORD};

fn run_subtol(args: &[&str], password: Option<&str>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_subtol"));
    command.args(args).env_remove("SUBTOL_PASSWORD").env("NO_COLOR", "1");
    if let Some(password) = password {
        command.env("SUBTOL_PASSWORD", password);
    }
    command.output().expect("failed to run subtol")
}

fn password() -> &'static str {
    std::str::from_utf8(FIXTURE_PASSWORD).unwrap()
}

/// Write the fixture for `kind` and an ACGT map file into `dir`.
fn write_fixture(dir: &Path, kind: RepresentationKind) -> (PathBuf, PathBuf) {
    let index = dir.join(format!("{}.idx", kind));
    fs::write(&index, file_for(&ACGT_FILES, kind)).unwrap();
    let map = dir.join("dna.map");
    fs::write(&map, "ACGT\n").unwrap();
    (index, map)
}

#[test]
fn test_inspect_shows_header() {
    let dir = tempfile::tempdir().unwrap();
    let (index, _) = write_fixture(dir.path(), RepresentationKind::FullBwt);

    let output = run_subtol(&["inspect", index.to_str().unwrap()], None);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("full-bwt"), "{}", stdout);
    assert!(stdout.contains("text length"), "{}", stdout);
}

#[test]
fn test_query_json_reports_positions() {
    let dir = tempfile::tempdir().unwrap();
    for kind in RepresentationKind::ALL {
        let (index, map) = write_fixture(dir.path(), kind);
        let output = run_subtol(
            &[
                "query",
                index.to_str().unwrap(),
                "ACGT",
                "GGG",
                "--map",
                map.to_str().unwrap(),
                "--json",
            ],
            Some(password()),
        );
        assert!(
            output.status.success(),
            "{}",
            String::from_utf8_lossy(&output.stderr)
        );

        let stdout = String::from_utf8_lossy(&output.stdout);
        let reports: Vec<serde_json::Value> = stdout
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(reports.len(), 2);

        assert_eq!(reports[0]["pattern"], "ACGT");
        assert_eq!(reports[0]["count"], 2);
        let mut positions: Vec<u64> = reports[0]["positions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_u64().unwrap())
            .collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 5]);

        assert_eq!(reports[1]["count"], 0);
    }
}

#[test]
fn test_query_limit_and_password_flag() {
    let dir = tempfile::tempdir().unwrap();
    let (index, map) = write_fixture(dir.path(), RepresentationKind::SaPsi);
    let output = run_subtol(
        &[
            "query",
            index.to_str().unwrap(),
            "A",
            "--map",
            map.to_str().unwrap(),
            "--password",
            password(),
            "--limit",
            "1",
            "--json",
        ],
        None,
    );
    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    // "ACGT ACGT" with the space folded to A
    assert_eq!(report["count"], 3);
    assert_eq!(report["positions"].as_array().unwrap().len(), 1);
}

#[test]
fn test_wrong_password_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (index, map) = write_fixture(dir.path(), RepresentationKind::BucketedBwt);
    let output = run_subtol(
        &[
            "query",
            index.to_str().unwrap(),
            "ACGT",
            "--map",
            map.to_str().unwrap(),
        ],
        Some("nope"),
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("integrity"), "{}", stderr);
}

#[test]
fn test_unmapped_pattern_byte_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (index, map) = write_fixture(dir.path(), RepresentationKind::SaPsi);
    let output = run_subtol(
        &[
            "query",
            index.to_str().unwrap(),
            "ACGN",
            "--map",
            map.to_str().unwrap(),
        ],
        Some(password()),
    );
    assert!(!output.status.success());
}
