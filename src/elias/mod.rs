// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Elias variable-length integer codes.
//!
//! Fixed-width arrays pay the full element width for every value. Postings
//! and sentence offsets are near-sorted, so their gaps are small and an Elias
//! code spends `O(log n)` bits on each instead.
//!
//! ```text
//! IntArray ──▶ GapEncoder ──▶ delta codes ──▶ BitWriter ──▶ bytes
//!                                                           │
//! runs     ◀── GapDecoder ◀── delta codes ◀── BitReader ◀───┘
//! ```
//!
//! Streams are decode-only from the front: no length prefix and no index.

pub mod bits;
pub mod codes;
pub mod gaps;

pub use bits::{BitReader, BitWriter};
pub use codes::{delta_decode, delta_encode, delta_len, gamma_decode, gamma_encode, gamma_len};
pub use gaps::{
    decode_gap_sequence, delta_path, encode_gap_runs, encode_gap_sequence,
    write_delta_coded_array, GapDecoder, GapEncoder, GapValue,
};
