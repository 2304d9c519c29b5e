// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Pass 1: collect the distinct values of every feature.
//!
//! The accumulator is an owned value that goes into [`collect_vocabulary`]
//! and comes back out, so several of them can be filled independently (one
//! per input shard, say) and combined with [`Vocabulary::merge`].
//!
//! Turning the value sets into pools is independent per feature. With the
//! `parallel` feature each pool is sorted and written on its own rayon task.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::source::{Record, SourceReader};
use crate::corpus::feature_path;
use crate::disk::{ReadMode, StringPool, StringPoolBuilder};
use crate::error::Result;

/// Distinct values per feature column, plus the token count.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    values: Vec<HashSet<Vec<u8>>>,
    tokens: u64,
}

impl Vocabulary {
    pub fn new(num_features: usize) -> Self {
        Self {
            values: vec![HashSet::new(); num_features],
            tokens: 0,
        }
    }

    /// Record one token. `fields` must have one entry per feature.
    pub fn observe(&mut self, fields: &[&[u8]]) {
        debug_assert_eq!(fields.len(), self.values.len());
        for (set, &value) in self.values.iter_mut().zip(fields) {
            if !set.contains(value) {
                set.insert(value.to_vec());
            }
        }
        self.tokens += 1;
    }

    /// Fold `other` into `self`. Both must cover the same features.
    pub fn merge(&mut self, other: Vocabulary) {
        debug_assert_eq!(self.values.len(), other.values.len());
        for (mine, theirs) in self.values.iter_mut().zip(other.values) {
            mine.extend(theirs);
        }
        self.tokens += other.tokens;
    }

    pub fn tokens(&self) -> u64 {
        self.tokens
    }

    pub fn num_features(&self) -> usize {
        self.values.len()
    }

    /// Distinct values seen for the feature in column `index`.
    pub fn distinct(&self, index: usize) -> usize {
        self.values.get(index).map_or(0, HashSet::len)
    }

    /// Distinct values summed over all features.
    pub fn total_strings(&self) -> usize {
        self.values.iter().map(HashSet::len).sum()
    }

    pub fn contains(&self, index: usize, value: &[u8]) -> bool {
        self.values.get(index).is_some_and(|set| set.contains(value))
    }

    /// Write one pool per feature into `dir`, in `features` order.
    pub fn into_pools(self, dir: &Path, features: &[String], mode: ReadMode) -> Result<Vec<StringPool>> {
        debug_assert_eq!(features.len(), self.values.len());

        let jobs: Vec<_> = self
            .values
            .into_iter()
            .zip(features.iter().map(|name| feature_path(dir, name)))
            .collect();

        #[cfg(feature = "parallel")]
        let jobs = jobs.into_par_iter();
        #[cfg(not(feature = "parallel"))]
        let jobs = jobs.into_iter();

        jobs.map(|(values, path)| StringPoolBuilder::new(values).build(&path, mode))
            .collect()
    }
}

/// Run pass 1 over `source`, adding every token to `vocabulary`.
///
/// `on_token` is called with the running token count.
pub fn collect_vocabulary<R: BufRead>(
    source: &mut SourceReader<'_, R>,
    mut vocabulary: Vocabulary,
    mut on_token: impl FnMut(u64),
) -> Result<Vocabulary> {
    while let Some(record) = source.next_record()? {
        if let Record::Token(fields) = record {
            vocabulary.observe(&fields);
            on_token(vocabulary.tokens);
        }
    }
    Ok(vocabulary)
}
