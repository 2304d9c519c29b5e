// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for corpus storage.
//!
//! Every failure is surfaced to the immediate caller. Nothing here is retried
//! or repaired: a corrupt file stays corrupt, a failed build leaves no corpus.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpixError {
    /// Array header is malformed, or the file length disagrees with it.
    #[error("corrupt header in {}: {reason}", path.display())]
    CorruptHeader { path: PathBuf, reason: String },

    /// Structural mismatch between related files (pool offsets vs blob, etc).
    #[error("corrupt file {}: {reason}", path.display())]
    CorruptFile { path: PathBuf, reason: String },

    /// No supported element width can hold the declared ceiling.
    #[error("no element width can hold max value {max_value}")]
    InvalidCapacity { max_value: u128 },

    #[error("value {value} exceeds declared maximum {max_value}")]
    ValueOutOfRange { value: u64, max_value: u64 },

    /// The value was not part of the pool's original string set.
    #[error("string {:?} is not in the pool", String::from_utf8_lossy(value))]
    UnknownString { value: Vec<u8> },

    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: u64, len: u64 },

    /// The corpus source has no usable feature header.
    #[error("malformed corpus header: {reason}")]
    MalformedHeader { reason: String },

    #[error("line {line} has {fields} fields, header declares {expected}")]
    MalformedRow {
        line: usize,
        fields: usize,
        expected: usize,
    },

    #[error("corpus has no feature named {feature:?}")]
    UnknownFeature { feature: String },

    /// `append` or `close` on a builder that was already closed.
    #[error("builder is already closed")]
    ClosedBuilder,

    /// Gamma and delta codes are only defined for n >= 1.
    #[error("{value} cannot be Elias-coded (domain starts at 1)")]
    NotEncodable { value: u64 },

    /// A bitstream ended mid-code or decoded to an impossible value.
    #[error("corrupt bitstream at bit {bit_offset}: {reason}")]
    CorruptStream { bit_offset: u64, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("corpus metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CorpixError>;
