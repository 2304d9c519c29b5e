// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.

#![doc(hidden)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::build::{build_corpus_file, BuildOptions};
use crate::corpus::Corpus;
use crate::disk::ReadMode;

/// Two sentences, three tokens, two features.
pub const SCENARIO_SOURCE: &str =
    "word\tpos\n# sentence\nthe\tART\ncat\tSUBST\n# sentence\nsat\tVERB";

/// Write `source` to `dir/sample.csv`, build `dir/sample.corpus` and open it.
///
/// Panics on any failure; only for tests.
pub fn build_sample(dir: &Path, source: &str) -> Corpus {
    let input = dir.join("sample.csv");
    fs::write(&input, source).expect("write sample source");
    let summary =
        build_corpus_file(&input, None, &BuildOptions::default()).expect("build sample corpus");
    Corpus::open(&summary.path, ReadMode::Mmap).expect("open sample corpus")
}

/// A deterministic word/lemma/pos source with `sentences` sentences of
/// `words` tokens each, drawn from a small vocabulary.
pub fn synthetic_source(sentences: usize, words: usize) -> String {
    const WORDS: [&str; 8] = ["the", "cat", "sat", "on", "a", "mat", "and", "slept"];
    const POS: [&str; 4] = ["ART", "SUBST", "VERB", "PREP"];

    let mut out = String::from("word\tlemma\tpos\n");
    let mut k = 0usize;
    for _ in 0..sentences {
        out.push_str("# sentence\n");
        for _ in 0..words {
            let word = WORDS[k % WORDS.len()];
            let _ = writeln!(out, "{}\t{}\t{}", word, word.to_uppercase(), POS[(k * 7) % POS.len()]);
            k += 1;
        }
    }
    out
}

/// Strictly ascending runs laid end to end, like concatenated postings
/// lists. `step` must be at least 1.
pub fn postings_runs(runs: usize, run_len: usize, step: u64) -> Vec<Vec<u64>> {
    (0..runs as u64)
        .map(|r| (0..run_len as u64).map(|i| r + i * step).collect())
        .collect()
}
