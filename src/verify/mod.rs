// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Corpus invariant checks.
//!
//! Opening a corpus only validates each file on its own. This walks the
//! whole thing and checks how the files relate:
//!
//! | Invariant                                   | Violation              |
//! |---------------------------------------------|------------------------|
//! | `sentences[0] == 0`                         | `MissingSentinel`      |
//! | `sentences[1..]` strictly increasing        | `UnsortedSentences`    |
//! | every sentence start is a token position    | `SentenceOutOfRange`   |
//! | every column has `num_words()` entries      | `LengthMismatch`       |
//! | every id indexes its pool                   | `InvalidId`            |
//! | pool entries strictly ascending by bytes    | `UnsortedPool`         |
//!
//! Violations are collected rather than returned as the first error, so an
//! inspector can show everything that is wrong at once.

use std::fmt;

use serde::Serialize;

use crate::corpus::Corpus;
use crate::disk::StringPool;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvariantViolation {
    /// `sentences` is empty or does not start with 0.
    MissingSentinel { found: Option<u64> },
    UnsortedSentences {
        index: usize,
        previous: u64,
        value: u64,
    },
    /// A sentence starts at or past the end of the token stream.
    SentenceOutOfRange {
        sentence: usize,
        start: u64,
        num_words: usize,
    },
    LengthMismatch {
        feature: String,
        len: usize,
        expected: usize,
    },
    /// First out-of-range id in a column. Later ones are not reported.
    InvalidId {
        feature: String,
        position: usize,
        id: u64,
        pool_len: usize,
    },
    UnsortedPool { feature: String, index: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::MissingSentinel { found: None } => {
                write!(f, "sentences is empty, expected sentinel 0")
            }
            InvariantViolation::MissingSentinel { found: Some(v) } => {
                write!(f, "sentences[0] is {}, expected sentinel 0", v)
            }
            InvariantViolation::UnsortedSentences {
                index,
                previous,
                value,
            } => write!(
                f,
                "sentences[{}] = {} does not follow {}",
                index, value, previous
            ),
            InvariantViolation::SentenceOutOfRange {
                sentence,
                start,
                num_words,
            } => write!(
                f,
                "sentence {} starts at {} but there are {} words",
                sentence, start, num_words
            ),
            InvariantViolation::LengthMismatch {
                feature,
                len,
                expected,
            } => write!(f, "feature '{}' has {} entries, expected {}", feature, len, expected),
            InvariantViolation::InvalidId {
                feature,
                position,
                id,
                pool_len,
            } => write!(
                f,
                "feature '{}' position {} has id {} but the pool has {} entries",
                feature, position, id, pool_len
            ),
            InvariantViolation::UnsortedPool { feature, index } => {
                write!(f, "pool of '{}' not sorted at entry {}", feature, index)
            }
        }
    }
}

/// Check every cross-file invariant of `corpus`. Empty means healthy.
pub fn verify_corpus(corpus: &Corpus) -> Result<Vec<InvariantViolation>> {
    let mut violations = Vec::new();
    let num_words = corpus.num_words();

    let starts = corpus.sentence_starts();
    match starts.iter().next() {
        Some(0) => {}
        found => violations.push(InvariantViolation::MissingSentinel { found }),
    }

    let mut previous: Option<u64> = None;
    for (index, value) in starts.iter().enumerate().skip(1) {
        if let Some(prev) = previous {
            if value <= prev {
                violations.push(InvariantViolation::UnsortedSentences {
                    index,
                    previous: prev,
                    value,
                });
            }
        }
        if value >= num_words as u64 {
            violations.push(InvariantViolation::SentenceOutOfRange {
                sentence: index,
                start: value,
                num_words,
            });
        }
        previous = Some(value);
    }

    for name in corpus.features() {
        let column = corpus.feature(name)?;
        if column.len() != num_words {
            violations.push(InvariantViolation::LengthMismatch {
                feature: name.clone(),
                len: column.len(),
                expected: num_words,
            });
        }

        let pool_len = column.pool().len();
        if let Some((position, id)) = column
            .ids()
            .iter()
            .enumerate()
            .find(|&(_, id)| id >= pool_len as u64)
        {
            violations.push(InvariantViolation::InvalidId {
                feature: name.clone(),
                position,
                id,
                pool_len,
            });
        }

        if let Some(index) = first_unsorted(column.pool())? {
            violations.push(InvariantViolation::UnsortedPool {
                feature: name.clone(),
                index,
            });
        }
    }

    Ok(violations)
}

fn first_unsorted(pool: &StringPool) -> Result<Option<usize>> {
    let mut previous: Option<&[u8]> = None;
    for (index, entry) in pool.iter().enumerate() {
        let entry = entry?;
        if previous.is_some_and(|prev| entry <= prev) {
            return Ok(Some(index));
        }
        previous = Some(entry);
    }
    Ok(None)
}
