//! Gap-sequence properties:
//! - runs encoded with explicit boundaries decode to the same runs
//! - a flat sequence decodes to the same values, split at every non-ascent
//! - near-sorted input costs far less than its fixed-width form

use corpix::disk::write_int_array;
use corpix::elias::encode_gap_runs;
use corpix::{decode_gap_sequence, encode_gap_sequence, GapDecoder, GapEncoder, IntArray, ReadMode};
use proptest::prelude::*;
use tempfile::TempDir;

use crate::common::postings_runs;

/// Strictly ascending run built from positive gaps.
fn ascending_run() -> impl Strategy<Value = Vec<u64>> {
    (0u64..1_000_000, prop::collection::vec(1u64..5000, 0..40)).prop_map(|(start, gaps)| {
        let mut run = vec![start];
        for g in gaps {
            let next = run.last().unwrap() + g;
            run.push(next);
        }
        run
    })
}

/// Where a flat sequence has to start a new run.
fn split_runs(values: &[u64]) -> Vec<Vec<u64>> {
    let mut runs: Vec<Vec<u64>> = Vec::new();
    for &v in values {
        match runs.last_mut() {
            Some(run) if *run.last().unwrap() < v => run.push(v),
            _ => runs.push(vec![v]),
        }
    }
    runs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_explicit_runs_roundtrip(runs in prop::collection::vec(ascending_run(), 0..12)) {
        let bytes = encode_gap_runs(&runs).unwrap();
        prop_assert_eq!(decode_gap_sequence(&bytes).unwrap(), runs);
    }

    #[test]
    fn prop_flat_sequence_roundtrip(values in prop::collection::vec(0u64..10_000, 0..200)) {
        let mut encoder = GapEncoder::new(Vec::new());
        encoder.extend(values.iter().copied()).unwrap();
        let runs = encoder.runs();
        let bytes = encoder.finish().unwrap();

        let decoded = decode_gap_sequence(&bytes).unwrap();
        prop_assert_eq!(decoded.len() as u64, runs);
        prop_assert_eq!(&decoded, &split_runs(&values));

        let flat: Vec<u64> = GapDecoder::new(&bytes).map(|v| v.unwrap().value).collect();
        prop_assert_eq!(flat, values);
    }

    #[test]
    fn prop_int_array_source(values in prop::collection::vec(any::<u32>(), 0..100)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.ia");
        let values: Vec<u64> = values.into_iter().map(u64::from).collect();
        write_int_array(&path, &values).unwrap();

        let array = IntArray::open(&path, ReadMode::Mmap).unwrap();
        let bytes = encode_gap_sequence(&array).unwrap();
        let flat: Vec<u64> = decode_gap_sequence(&bytes).unwrap().into_iter().flatten().collect();
        prop_assert_eq!(flat, values);
    }

    #[test]
    fn prop_truncation_never_panics(runs in prop::collection::vec(ascending_run(), 1..5), cut in 1usize..4) {
        let bytes = encode_gap_runs(&runs).unwrap();
        let cut = cut.min(bytes.len());
        // Either a clean prefix of the runs or a CorruptStream error.
        let _ = decode_gap_sequence(&bytes[..bytes.len() - cut]);
    }
}

#[test]
fn test_postings_compress_below_fixed_width() {
    let runs = postings_runs(50, 200, 3);
    let bytes = encode_gap_runs(&runs).unwrap();
    let values: usize = runs.iter().map(Vec::len).sum();
    // Fixed-width storage needs two bytes per value here; gaps of 3 need 5 bits.
    assert!(bytes.len() < values, "{} bytes for {} values", bytes.len(), values);
    assert_eq!(decode_gap_sequence(&bytes).unwrap(), runs);
}
