// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for gap encoding of arbitrary value sequences.
//!
//! Any sequence below `u64::MAX` encodes, and decoding returns the same
//! values with a run boundary at every non-ascent.

#![no_main]

use corpix::{decode_gap_sequence, GapEncoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|values: Vec<u64>| {
    let values: Vec<u64> = values.into_iter().filter(|&v| v < u64::MAX).collect();

    let mut encoder = GapEncoder::new(Vec::new());
    encoder
        .extend(values.iter().copied())
        .expect("values below u64::MAX always encode");
    let runs = encoder.runs();
    let bytes = encoder.finish().expect("writing to a Vec cannot fail");

    let decoded = decode_gap_sequence(&bytes).expect("freshly encoded stream must decode");
    assert_eq!(decoded.len() as u64, runs);
    let flat: Vec<u64> = decoded.into_iter().flatten().collect();
    assert_eq!(flat, values);
});
