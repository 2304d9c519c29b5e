// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk array formats.
//!
//! Everything a corpus is made of bottoms out here: fixed-width integer
//! arrays, and string columns layered on top of them as a sorted pool plus an
//! array of identifiers.
//!
//! # File layout
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │ IntArray        [count: u64][width: u8][count × width bytes]   │
//! ├────────────────────────────────────────────────────────────────┤
//! │ StringPool      <base>.strings   concatenated sorted entries   │
//! │                 <base>.starts    IntArray of N + 1 offsets     │
//! ├────────────────────────────────────────────────────────────────┤
//! │ StringArray     <path>           IntArray of pool identifiers  │
//! │                 + StringPool at base <path>                    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

mod header;
mod int_array;
mod storage;
mod string_array;
mod string_pool;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use header::{ElemWidth, IntArrayHeader, HEADER_SIZE};
pub use int_array::{write_int_array, IntArray, IntArrayBuilder};
pub use storage::ReadMode;
pub use string_array::{StringArray, StringArrayBuilder};
pub use string_pool::{StringPool, StringPoolBuilder, STARTS_SUFFIX, STRINGS_SUFFIX};

/// `base` with `suffix` appended to its final component ("a/b" + ".x" = "a/b.x").
pub(crate) fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
