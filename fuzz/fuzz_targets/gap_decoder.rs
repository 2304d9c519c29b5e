// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the Elias delta gap decoder.
//!
//! `.delta` files come off disk, so the decoder sees arbitrary bytes.
//! It must return values or `CorruptStream`, never panic or loop forever.

#![no_main]

use corpix::{decode_gap_sequence, GapDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let result = decode_gap_sequence(data);

    // The streaming decoder agrees with the collecting one.
    let mut flat = Vec::new();
    let mut failed = false;
    for item in GapDecoder::new(data) {
        match item {
            Ok(v) => flat.push(v.value),
            Err(_) => {
                failed = true;
                break;
            }
        }
    }

    match result {
        Ok(runs) => {
            assert!(!failed, "collecting decoder succeeded where streaming failed");
            let expected: Vec<u64> = runs.iter().flatten().copied().collect();
            assert_eq!(flat, expected);
            // Every decoded run is non-empty and strictly ascending.
            for run in &runs {
                assert!(!run.is_empty());
                assert!(run.windows(2).all(|w| w[0] < w[1]));
            }
        }
        Err(_) => assert!(failed, "streaming decoder accepted a corrupt stream"),
    }
});
