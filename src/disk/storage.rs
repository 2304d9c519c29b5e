// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Read-only byte backing for finished files.
//!
//! Mapping and buffering are a caller choice, not a format difference: both
//! hand out the same `&[u8]` image of the file, so every decoder above this
//! layer is oblivious to how the bytes got into memory.

use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use crate::error::Result;

/// How a finished file is brought into memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReadMode {
    /// Shared, zero-copy, page-cache backed. Preferred for many readers.
    #[default]
    Mmap,
    /// Read the whole file into a heap buffer.
    Buffered,
}

pub(crate) enum Storage {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl Storage {
    pub(crate) fn open(path: &Path, mode: ReadMode) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        match mode {
            // Empty files have nothing to map.
            ReadMode::Mmap if len > 0 => {
                // SAFETY: finished files are immutable; writers publish a
                // corpus by rename and never touch it afterwards.
                #[allow(unsafe_code)]
                let map = unsafe { Mmap::map(&file)? };
                Ok(Self::Mapped(map))
            }
            _ => Ok(Self::Buffered(std::fs::read(path)?)),
        }
    }
}

impl Deref for Storage {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(map) => map,
            Self::Buffered(buf) => buf,
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Mapped(_) => "Mapped",
            Self::Buffered(_) => "Buffered",
        };
        write!(f, "Storage::{}({} bytes)", kind, self.len())
    }
}
