// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for opening IntArray files.
//!
//! A truncated or tampered header must surface as `CorruptHeader` or
//! `CorruptFile` at open time; once open, every in-range read succeeds.

#![no_main]

use corpix::disk::IntArrayHeader;
use corpix::{IntArray, ReadMode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing alone never panics.
    let header = IntArrayHeader::parse(data);

    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let path = dir.path().join("fuzz.ia");
    if std::fs::write(&path, data).is_err() {
        return;
    }

    for mode in [ReadMode::Mmap, ReadMode::Buffered] {
        if let Ok(array) = IntArray::open(&path, mode) {
            let header = header.as_ref().expect("opened file must have a valid header");
            assert_eq!(array.len() as u64, header.count);
            assert_eq!(Some(data.len() as u64), header.expected_file_len());
            for i in 0..array.len().min(64) {
                assert!(array.get(i).is_ok());
            }
            assert!(array.get(array.len()).is_err());
        }
    }
});
