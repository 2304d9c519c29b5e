//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use corpix::{build_corpus, BuildOptions, BuildSummary, Corpus, ReadMode};

// Re-export canonical fixtures from corpix::testing
pub use corpix::testing::{build_sample, postings_runs, synthetic_source, SCENARIO_SOURCE};

/// Write `text` to `dir/name` and return the path.
pub fn write_source(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

/// Build `text` into `dir/t.corpus` with default options.
pub fn build_text(dir: &Path, text: &str) -> BuildSummary {
    build_with(dir, text, &BuildOptions::default())
}

pub fn build_with(dir: &Path, text: &str, options: &BuildOptions) -> BuildSummary {
    build_corpus(Cursor::new(text.as_bytes().to_vec()), &dir.join("t.corpus"), options).unwrap()
}

/// Build and open in both read modes.
pub fn open_both(dir: &Path, text: &str) -> (Corpus, Corpus) {
    let summary = build_text(dir, text);
    (
        Corpus::open(&summary.path, ReadMode::Mmap).unwrap(),
        Corpus::open(&summary.path, ReadMode::Buffered).unwrap(),
    )
}

/// Every value of `feature`, in token order, as strings.
pub fn column_strings(corpus: &Corpus, feature: &str) -> Vec<String> {
    corpus
        .feature(feature)
        .unwrap()
        .iter()
        .map(|v| String::from_utf8(v.unwrap().to_vec()).unwrap())
        .collect()
}
