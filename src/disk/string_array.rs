// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Dictionary-coded string columns.
//!
//! A `StringArray` is an [`IntArray`] of identifiers plus the [`StringPool`]
//! they point into. The pool has to exist before the first append, because
//! identifiers are ranks in the complete sorted value set. That is what forces
//! the corpus build into two passes.

use std::path::Path;

use super::int_array::{IntArray, IntArrayBuilder};
use super::storage::ReadMode;
use super::string_pool::{StringPool, StringPoolBuilder};
use crate::error::{CorpixError, Result};

/// Appends values to a string column whose pool is already written.
pub struct StringArrayBuilder {
    ids: IntArrayBuilder,
    pool: StringPool,
}

impl StringArrayBuilder {
    /// Start a column at `path`. The reader looks for the pool at the same
    /// base path, so `pool` should have been built there.
    pub fn new(path: impl AsRef<Path>, pool: StringPool) -> Result<Self> {
        let max_id = (pool.len() as u64).saturating_sub(1);
        let ids = IntArrayBuilder::new(path, max_id)?;
        Ok(Self { ids, pool })
    }

    /// Write the pool for `strings` at `path`, then start the column.
    pub fn with_strings<I, S>(path: impl AsRef<Path>, strings: I, mode: ReadMode) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        let path = path.as_ref();
        let pool = StringPoolBuilder::new(strings).build(path, mode)?;
        Self::new(path, pool)
    }

    /// Intern `value` and append its identifier.
    ///
    /// Fails with `UnknownString` when `value` was not in the pool's set.
    pub fn append(&mut self, value: impl AsRef<[u8]>) -> Result<()> {
        if self.ids.is_closed() {
            return Err(CorpixError::ClosedBuilder);
        }
        let id = self.pool.intern(value)?;
        self.ids.append(id)
    }

    pub fn close(&mut self) -> Result<()> {
        self.ids.close()
    }

    pub fn len(&self) -> u64 {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn pool(&self) -> &StringPool {
        &self.pool
    }
}

/// A finished string column, open read-only.
#[derive(Debug)]
pub struct StringArray {
    ids: IntArray,
    pool: StringPool,
}

impl StringArray {
    pub fn open(path: impl AsRef<Path>, mode: ReadMode) -> Result<Self> {
        let path = path.as_ref();
        let pool = StringPool::open(path, mode)?;
        let ids = IntArray::open(path, mode)?;
        Ok(Self { ids, pool })
    }

    /// Value at `index`.
    pub fn get(&self, index: usize) -> Result<&[u8]> {
        self.pool.resolve(self.ids.get(index)?)
    }

    /// Pool identifier at `index`. Compare these instead of bytes when
    /// matching against an interned constant.
    pub fn id(&self, index: usize) -> Result<u64> {
        self.ids.get(index)
    }

    pub fn intern(&self, value: impl AsRef<[u8]>) -> Result<u64> {
        self.pool.intern(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<&[u8]>> + '_ {
        self.ids.iter().map(move |id| self.pool.resolve(id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &IntArray {
        &self.ids
    }

    pub fn pool(&self) -> &StringPool {
        &self.pool
    }
}
