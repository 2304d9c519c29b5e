//! Tests for the `corpix` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use corpix::{write_delta_coded_array, IntArray, ReadMode};
use corpix::disk::write_int_array;
use tempfile::TempDir;

use crate::common::{write_source, SCENARIO_SOURCE};

fn corpix(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_corpix"))
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env("CORPIX_LOG", "warn")
        .output()
        .expect("run corpix")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_build_then_sentence() {
    let dir = TempDir::new().unwrap();
    write_source(dir.path(), "sample.csv", SCENARIO_SOURCE);

    let build = corpix(&["build", "sample.csv", "--quiet"], dir.path());
    assert!(build.status.success(), "{}", String::from_utf8_lossy(&build.stderr));
    assert!(dir.path().join("sample.corpus").is_dir());

    let sentence = corpix(&["sentence", "sample.corpus", "1"], dir.path());
    assert!(sentence.status.success());
    let text = stdout(&sentence);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["# word\tpos", "the\tART", "cat\tSUBST"]);
}

#[test]
fn test_build_json_summary() {
    let dir = TempDir::new().unwrap();
    write_source(dir.path(), "sample.csv", SCENARIO_SOURCE);
    let out = corpix(&["build", "sample.csv", "-o", "out.corpus", "--json"], dir.path());
    assert!(out.status.success());

    let summary: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(summary["tokens"], 3);
    assert_eq!(summary["sentences"], 2);
    assert_eq!(summary["features"][0]["name"], "word");
    assert!(dir.path().join("out.corpus").is_dir());
}

#[test]
fn test_inspect_json_accepts_source_path() {
    let dir = TempDir::new().unwrap();
    write_source(dir.path(), "sample.csv", SCENARIO_SOURCE);
    assert!(corpix(&["build", "sample.csv", "-q"], dir.path()).status.success());

    let out = corpix(&["inspect", "sample.csv", "--json", "--read-mode", "buffered"], dir.path());
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["tokens"], 3);
    assert_eq!(report["violations"].as_array().unwrap().len(), 0);

    let files = report["files"].as_array().unwrap();
    let sentences = files.iter().find(|f| f["name"] == "sentences").unwrap();
    let bytes = fs::read(dir.path().join("sample.corpus/sentences")).unwrap();
    assert_eq!(sentences["crc32"], format!("{:08x}", crc32fast::hash(&bytes)));
}

#[test]
fn test_bad_sentence_number_fails() {
    let dir = TempDir::new().unwrap();
    write_source(dir.path(), "sample.csv", SCENARIO_SOURCE);
    assert!(corpix(&["build", "sample.csv", "-q"], dir.path()).status.success());

    let out = corpix(&["sentence", "sample.corpus", "0"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("out of bounds"));
}

#[test]
fn test_delta_writes_and_verifies() {
    let dir = TempDir::new().unwrap();
    let values: Vec<u64> = vec![3, 7, 2, 9, 10, 40, 1, 2, 3];
    write_int_array(dir.path().join("postings.ia"), &values).unwrap();

    let out = corpix(&["delta", "postings.ia", "--verify"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout(&out).contains("ok"));

    let written = fs::read(dir.path().join("postings.delta")).unwrap();
    let array = IntArray::open(dir.path().join("postings.ia"), ReadMode::Mmap).unwrap();
    let mut expected = Vec::new();
    write_delta_coded_array(&mut expected, &array).unwrap();
    assert_eq!(written, expected);
}

#[test]
fn test_delta_rejects_non_array() {
    let dir = TempDir::new().unwrap();
    write_source(dir.path(), "junk.ia", "not an array");
    let out = corpix(&["delta", "junk.ia"], dir.path());
    assert_eq!(out.status.code(), Some(1));
}
