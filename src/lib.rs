// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Columnar corpus storage and Elias-coded integer sequences.
//!
//! A corpus is a token stream with named features per token (word, lemma,
//! part of speech, ...). This crate stores it as one dictionary-coded column
//! per feature plus an array of sentence starts, all memory-mappable and
//! randomly addressable, and provides the gap codec used to compress
//! postings over it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │   build/     │────▶│    disk/      │◀────│  corpus.rs   │
//! │ (two passes, │     │ (IntArray,    │     │ (Corpus,     │
//! │  Vocabulary) │     │  StringPool,  │     │  Word)       │
//! └──────────────┘     │  StringArray) │     └──────────────┘
//!                      └───────────────┘            │
//!                             ▲                     ▼
//!                      ┌──────┴────────┐     ┌──────────────┐
//!                      │   elias/      │     │   verify/    │
//!                      │ (gamma/delta, │     │ (cross-file  │
//!                      │  gap runs)    │     │  invariants) │
//!                      └───────────────┘     └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use corpix::{build_corpus_file, BuildOptions, Corpus, ReadMode};
//! use std::path::Path;
//!
//! # fn main() -> corpix::Result<()> {
//! let summary = build_corpus_file(Path::new("bnc.csv"), None, &BuildOptions::default())?;
//! let corpus = Corpus::open(&summary.path, ReadMode::Mmap)?;
//! for word in corpus.sentence(1)? {
//!     println!("{}", word);
//! }
//! # Ok(())
//! # }
//! ```

pub mod build;
pub mod corpus;
pub mod disk;
pub mod elias;
pub mod error;
pub mod testing;
pub mod verify;

pub use build::{
    build_corpus, build_corpus_file, default_corpus_dir, BuildOptions, BuildSummary,
    FeatureSummary, Vocabulary,
};
pub use corpus::{Corpus, Word};
pub use disk::{
    ElemWidth, IntArray, IntArrayBuilder, ReadMode, StringArray, StringArrayBuilder, StringPool,
    StringPoolBuilder,
};
pub use elias::{
    decode_gap_sequence, delta_decode, delta_encode, delta_path, encode_gap_sequence,
    gamma_decode, gamma_encode, write_delta_coded_array, BitReader, BitWriter, GapDecoder,
    GapEncoder,
};
pub use error::{CorpixError, Result};
pub use verify::{verify_corpus, InvariantViolation};
