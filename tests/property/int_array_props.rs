//! IntArray properties:
//! - the chosen width is the narrowest of {1, 2, 4, 8} covering the ceiling
//! - values read back exactly, in order, in both read modes
//! - appending past the ceiling fails and leaves the count unchanged

use corpix::{CorpixError, ElemWidth, IntArray, IntArrayBuilder, ReadMode};
use proptest::prelude::*;
use tempfile::TempDir;

fn expected_width(max_value: u64) -> usize {
    [1usize, 2, 4, 8]
        .into_iter()
        .find(|&w| w == 8 || max_value < 1u64 << (8 * w))
        .unwrap()
}

/// A ceiling from every width class, and values at or under it.
fn ceiling_and_values() -> impl Strategy<Value = (u64, Vec<u64>)> {
    prop_oneof![
        0u64..=0xFF,
        0x100u64..=0xFFFF,
        0x1_0000u64..=0xFFFF_FFFF,
        0x1_0000_0000u64..=u64::MAX,
    ]
    .prop_flat_map(|max| (Just(max), prop::collection::vec(0..=max, 0..200)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_width_is_minimal(max_value: u64) {
        let width = ElemWidth::for_max_value(u128::from(max_value)).unwrap();
        prop_assert_eq!(width.bytes(), expected_width(max_value));
        prop_assert!(width.max_value() >= max_value);
    }

    #[test]
    fn prop_roundtrip((max_value, values) in ceiling_and_values()) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("arr");

        let mut builder = IntArrayBuilder::new(&path, max_value).unwrap();
        builder.extend(values.iter().copied()).unwrap();
        builder.close().unwrap();

        for mode in [ReadMode::Mmap, ReadMode::Buffered] {
            let array = IntArray::open(&path, mode).unwrap();
            prop_assert_eq!(array.len(), values.len());
            prop_assert_eq!(array.elem_width().bytes(), expected_width(max_value));
            prop_assert_eq!(array.to_vec(), values.clone());
            for (i, &v) in values.iter().enumerate() {
                prop_assert_eq!(array.get(i).unwrap(), v);
            }
            prop_assert!(array.get(values.len()).is_err());
        }
    }

    #[test]
    fn prop_over_ceiling_rejected(max_value in 0u64..u64::MAX, excess in 1u64..1000) {
        let dir = TempDir::new().unwrap();
        let mut builder = IntArrayBuilder::new(dir.path().join("arr"), max_value).unwrap();
        builder.append(max_value).unwrap();

        let value = max_value.saturating_add(excess);
        let is_out_of_range = matches!(
            builder.append(value),
            Err(CorpixError::ValueOutOfRange { .. })
        );
        prop_assert!(is_out_of_range);
        prop_assert_eq!(builder.len(), 1);
    }

    #[test]
    fn prop_truncated_file_is_corrupt(values in prop::collection::vec(any::<u16>(), 1..50), cut in 1usize..8) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("arr");
        let values: Vec<u64> = values.into_iter().map(u64::from).collect();
        corpix::disk::write_int_array(&path, &values).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let cut = cut.min(bytes.len() - corpix::disk::HEADER_SIZE);
        std::fs::write(&path, &bytes[..bytes.len() - cut]).unwrap();

        let is_corrupt = matches!(
            IntArray::open(&path, ReadMode::Mmap),
            Err(CorpixError::CorruptHeader { .. })
        );
        prop_assert!(is_corrupt);
    }
}
