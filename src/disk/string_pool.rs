// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Sorted, deduplicated string pools with dense identifiers.
//!
//! Same trick as a Parquet dictionary page, except the dictionary is sorted
//! and lives in its own files so it can be memory-mapped. Identifier = rank
//! in byte order. That gives both directions for free:
//!
//! - id → bytes: two offset lookups and a slice, O(1)
//! - bytes → id: binary search over the ranks, O(log n)
//!
//! # Files
//!
//! ```text
//! <base>.strings   concatenated bytes of every entry, in sorted order
//! <base>.starts    IntArray, N + 1 offsets into .strings (last = blob length)
//! ```
//!
//! The pool is immutable once written. "Interning" means resolving a value to
//! the identifier it already has, never inserting.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::int_array::{IntArray, IntArrayBuilder};
use super::storage::{ReadMode, Storage};
use super::with_suffix;
use crate::error::{CorpixError, Result};

pub const STRINGS_SUFFIX: &str = ".strings";
pub const STARTS_SUFFIX: &str = ".starts";

// ============================================================================
// BUILDER
// ============================================================================

/// The complete value set of one column, sorted and ready to write.
#[derive(Debug, Clone, Default)]
pub struct StringPoolBuilder {
    strings: Vec<Vec<u8>>,
}

impl StringPoolBuilder {
    /// Sort the input by byte value and drop duplicates.
    pub fn new<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        let mut strings: Vec<Vec<u8>> = strings.into_iter().map(Into::into).collect();
        strings.sort_unstable();
        strings.dedup();
        Self { strings }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Entries in identifier order.
    pub fn strings(&self) -> &[Vec<u8>] {
        &self.strings
    }

    /// Write `<base>.strings` and `<base>.starts`.
    pub fn write(&self, base: &Path) -> Result<()> {
        let blob_len: u64 = self.strings.iter().map(|s| s.len() as u64).sum();

        let mut starts = IntArrayBuilder::new(with_suffix(base, STARTS_SUFFIX), blob_len)?;
        let mut blob = BufWriter::new(File::create(with_suffix(base, STRINGS_SUFFIX))?);

        let mut offset = 0u64;
        starts.append(offset)?;
        for s in &self.strings {
            blob.write_all(s)?;
            offset += s.len() as u64;
            starts.append(offset)?;
        }

        blob.flush()?;
        starts.close()?;

        debug!(base = %base.display(), entries = self.strings.len(), blob_len, "string pool written");
        Ok(())
    }

    /// Write the pool and reopen it read-only.
    pub fn build(&self, base: &Path, mode: ReadMode) -> Result<StringPool> {
        self.write(base)?;
        StringPool::open(base, mode)
    }
}

// ============================================================================
// READER
// ============================================================================

#[derive(Debug)]
pub struct StringPool {
    base: PathBuf,
    starts: IntArray,
    blob: Storage,
}

impl StringPool {
    pub fn open(base: impl AsRef<Path>, mode: ReadMode) -> Result<Self> {
        let base = base.as_ref().to_path_buf();
        let starts = IntArray::open(with_suffix(&base, STARTS_SUFFIX), mode)?;
        let blob_path = with_suffix(&base, STRINGS_SUFFIX);
        let blob = Storage::open(&blob_path, mode)?;

        let corrupt = |reason: String| CorpixError::CorruptFile {
            path: blob_path.clone(),
            reason,
        };

        let first = starts
            .iter()
            .next()
            .ok_or_else(|| corrupt("offset table is empty".to_string()))?;
        let last = starts.get(starts.len() - 1)?;
        if first != 0 || last != blob.len() as u64 {
            return Err(corrupt(format!(
                "offsets span {}..{} but blob has {} bytes",
                first,
                last,
                blob.len()
            )));
        }

        Ok(Self { base, starts, blob })
    }

    /// Number of distinct strings.
    pub fn len(&self) -> usize {
        self.starts.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes of the string with identifier `id`.
    pub fn resolve(&self, id: u64) -> Result<&[u8]> {
        let index = usize::try_from(id).unwrap_or(usize::MAX);
        if index >= self.len() {
            return Err(CorpixError::IndexOutOfBounds {
                index: id,
                len: self.len() as u64,
            });
        }
        let start = self.starts.get(index)?;
        let end = self.starts.get(index + 1)?;
        if start > end || end > self.blob.len() as u64 {
            return Err(CorpixError::CorruptFile {
                path: with_suffix(&self.base, STARTS_SUFFIX),
                reason: format!("entry {} spans {}..{}", id, start, end),
            });
        }
        Ok(&self.blob[start as usize..end as usize])
    }

    /// Identifier of `value`, by binary search over the sorted entries.
    pub fn intern(&self, value: impl AsRef<[u8]>) -> Result<u64> {
        let value = value.as_ref();
        let (mut lo, mut hi) = (0u64, self.len() as u64);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.resolve(mid)?.cmp(value) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Ok(mid),
            }
        }
        Err(CorpixError::UnknownString {
            value: value.to_vec(),
        })
    }

    pub fn contains(&self, value: impl AsRef<[u8]>) -> bool {
        self.intern(value).is_ok()
    }

    /// Entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = Result<&[u8]>> + '_ {
        (0..self.len() as u64).map(move |id| self.resolve(id))
    }

    /// Size of the concatenated string blob.
    pub fn blob_len(&self) -> usize {
        self.blob.len()
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}
