//! Elias code properties:
//! - gamma and delta decode back to the encoded value for every n >= 1
//! - code lengths match the bits actually written
//! - a stream of codes decodes in order and ends cleanly at the padding

use corpix::elias::{delta_len, gamma_len};
use corpix::{delta_decode, delta_encode, gamma_decode, gamma_encode, BitReader, BitWriter};
use proptest::prelude::*;

/// Small values hit the short codes; the full range hits the long ones.
fn positive() -> impl Strategy<Value = u64> {
    prop_oneof![1u64..64, 1u64..=u64::MAX]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn prop_gamma_roundtrip(n in positive()) {
        let mut w = BitWriter::new(Vec::new());
        gamma_encode(&mut w, n).unwrap();
        prop_assert_eq!(w.bits_written(), u64::from(gamma_len(n).unwrap()));
        let bytes = w.finish().unwrap();

        let mut r = BitReader::new(&bytes);
        prop_assert_eq!(gamma_decode(&mut r).unwrap(), Some(n));
        prop_assert_eq!(gamma_decode(&mut r).unwrap(), None);
    }

    #[test]
    fn prop_delta_roundtrip(n in positive()) {
        let mut w = BitWriter::new(Vec::new());
        delta_encode(&mut w, n).unwrap();
        prop_assert_eq!(w.bits_written(), u64::from(delta_len(n).unwrap()));
        let bytes = w.finish().unwrap();

        let mut r = BitReader::new(&bytes);
        prop_assert_eq!(delta_decode(&mut r).unwrap(), Some(n));
        prop_assert_eq!(delta_decode(&mut r).unwrap(), None);
    }

    #[test]
    fn prop_delta_stream(values in prop::collection::vec(positive(), 0..100)) {
        let mut w = BitWriter::new(Vec::new());
        for &n in &values {
            delta_encode(&mut w, n).unwrap();
        }
        let bits = w.bits_written();
        let bytes = w.finish().unwrap();
        prop_assert_eq!(bytes.len() as u64, bits.div_ceil(8));

        let mut r = BitReader::new(&bytes);
        let mut decoded = Vec::new();
        while let Some(n) = delta_decode(&mut r).unwrap() {
            decoded.push(n);
        }
        prop_assert_eq!(decoded, values);
    }

    #[test]
    fn prop_delta_not_longer_for_large_values(n in (1u64 << 32)..=u64::MAX) {
        prop_assert!(delta_len(n).unwrap() < gamma_len(n).unwrap());
    }
}
