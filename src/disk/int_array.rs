// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fixed-width unsigned integer arrays on disk.
//!
//! Two-phase lifecycle. An [`IntArrayBuilder`] appends values strictly in
//! final order and is closed exactly once, which rewrites the header with the
//! real count. After that the file is immutable and [`IntArray`] opens it for
//! O(1) random access.
//!
//! Every value takes the same number of bytes: the smallest of 1, 2, 4 or 8
//! that covers the declared ceiling. Bit-packing would be denser, but then a
//! lookup is no longer a plain slice index into a memory map.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::header::{ElemWidth, IntArrayHeader, HEADER_SIZE};
use super::storage::{ReadMode, Storage};
use crate::error::{CorpixError, Result};

// ============================================================================
// BUILDER
// ============================================================================

/// Append-only writer for an integer array file.
///
/// Dropping an unclosed builder still finalizes the header, so the file on
/// disk is always well-formed for whatever was appended.
pub struct IntArrayBuilder {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    max_value: u64,
    elem_width: ElemWidth,
    count: u64,
}

impl IntArrayBuilder {
    /// Create (or truncate) `path` for an array whose values never exceed
    /// `max_value`.
    pub fn new(path: impl AsRef<Path>, max_value: u64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let elem_width = ElemWidth::for_max_value(u128::from(max_value))?;

        let mut writer = BufWriter::new(File::create(&path)?);
        // Placeholder; close() rewrites it once the count is known.
        IntArrayHeader {
            count: 0,
            elem_width,
        }
        .write(&mut writer)?;

        debug!(path = %path.display(), max_value, width = elem_width.bytes(), "int array builder opened");

        Ok(Self {
            path,
            writer: Some(writer),
            max_value,
            elem_width,
            count: 0,
        })
    }

    pub fn append(&mut self, value: u64) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(CorpixError::ClosedBuilder)?;
        if value > self.max_value {
            return Err(CorpixError::ValueOutOfRange {
                value,
                max_value: self.max_value,
            });
        }
        writer.write_all(self.elem_width.encode(value).as_ref())?;
        self.count += 1;
        Ok(())
    }

    pub fn extend<I: IntoIterator<Item = u64>>(&mut self, values: I) -> Result<()> {
        values.into_iter().try_for_each(|v| self.append(v))
    }

    /// Flush buffered values and write the final header.
    ///
    /// Must be called once. A second call fails with `ClosedBuilder`.
    pub fn close(&mut self) -> Result<()> {
        let writer = self.writer.take().ok_or(CorpixError::ClosedBuilder)?;
        self.finalize(writer)
    }

    fn finalize(&self, writer: BufWriter<File>) -> Result<()> {
        let mut file = writer.into_inner().map_err(|e| e.into_error())?;
        file.seek(SeekFrom::Start(0))?;
        IntArrayHeader {
            count: self.count,
            elem_width: self.elem_width,
        }
        .write(&mut file)?;
        file.flush()?;
        debug!(path = %self.path.display(), count = self.count, "int array closed");
        Ok(())
    }

    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    pub fn max_value(&self) -> u64 {
        self.max_value
    }

    pub fn elem_width(&self) -> ElemWidth {
        self.elem_width
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for IntArrayBuilder {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            warn!(path = %self.path.display(), "int array builder dropped unclosed, finalizing");
            if let Err(e) = self.finalize(writer) {
                warn!(path = %self.path.display(), error = %e, "implicit finalize failed");
            }
        }
    }
}

/// Write `values` as a complete array whose ceiling is their maximum.
pub fn write_int_array(path: impl AsRef<Path>, values: &[u64]) -> Result<()> {
    let max_value = values.iter().copied().max().unwrap_or(0);
    let mut builder = IntArrayBuilder::new(path, max_value)?;
    builder.extend(values.iter().copied())?;
    builder.close()
}

// ============================================================================
// READER
// ============================================================================

/// A finished integer array, open read-only.
#[derive(Debug)]
pub struct IntArray {
    path: PathBuf,
    storage: Storage,
    len: usize,
    elem_width: ElemWidth,
}

impl IntArray {
    /// Open a finished array. Fails with `CorruptHeader` when the header is
    /// malformed or the file size disagrees with `count * width + 9`.
    pub fn open(path: impl AsRef<Path>, mode: ReadMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let storage = Storage::open(&path, mode)?;

        let corrupt = |reason: String| CorpixError::CorruptHeader {
            path: path.clone(),
            reason,
        };

        let header = IntArrayHeader::parse(&storage).map_err(&corrupt)?;
        let expected = header
            .expected_file_len()
            .ok_or_else(|| corrupt(format!("count {} overflows file size", header.count)))?;
        if expected != storage.len() as u64 {
            return Err(corrupt(format!(
                "header promises {} bytes ({} × {}B), file has {}",
                expected,
                header.count,
                header.elem_width.bytes(),
                storage.len()
            )));
        }

        debug!(path = %path.display(), count = header.count, width = header.elem_width.bytes(), ?mode, "int array opened");

        Ok(Self {
            path,
            storage,
            // Fits: the whole file is already addressable in memory.
            len: header.count as usize,
            elem_width: header.elem_width,
        })
    }

    /// Value at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<u64> {
        if index >= self.len {
            return Err(CorpixError::IndexOutOfBounds {
                index: index as u64,
                len: self.len as u64,
            });
        }
        let width = self.elem_width.bytes();
        let start = HEADER_SIZE + index * width;
        Ok(self.elem_width.decode(&self.storage[start..start + width]))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = u64> + '_ {
        let width = self.elem_width;
        self.storage[HEADER_SIZE..]
            .chunks_exact(width.bytes())
            .map(move |chunk| width.decode(chunk))
    }

    pub fn to_vec(&self) -> Vec<u64> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn elem_width(&self) -> ElemWidth {
        self.elem_width
    }

    /// Size of the file image in bytes, header included.
    pub fn byte_len(&self) -> usize {
        self.storage.len()
    }

    /// Raw file image, header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
