// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Integer array header and element widths.
//!
//! The header is 9 bytes: the element count as a little-endian u64, then the
//! element width in bytes. That is the whole layout story. Element `i` lives
//! at `HEADER_SIZE + i * width`, so a reader never has to scan anything.
//!
//! ```text
//! ┌──────────────┬───────┬──────────────────────────────────┐
//! │ count: u64 LE│ width │ count × width bytes, LE unsigned │
//! └──────────────┴───────┴──────────────────────────────────┘
//!      8 bytes     1 byte
//! ```

use std::io::{self, Write};

use crate::error::{CorpixError, Result};

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 9;

// ============================================================================
// ELEMENT WIDTH
// ============================================================================

/// Byte width of one stored element. Only powers of two, so addressing stays
/// a multiply-add with no bit shuffling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElemWidth {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

impl ElemWidth {
    const ALL: [ElemWidth; 4] = [Self::One, Self::Two, Self::Four, Self::Eight];

    /// Smallest width whose range `2^(8w) - 1` covers `max_value`.
    pub fn for_max_value(max_value: u128) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|w| max_value <= u128::from(w.max_value()))
            .ok_or(CorpixError::InvalidCapacity { max_value })
    }

    /// Parse the width byte stored in a header.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|w| *w as u8 == byte)
    }

    #[inline]
    pub fn bytes(self) -> usize {
        self as usize
    }

    /// Largest value representable in this width.
    pub fn max_value(self) -> u64 {
        match self {
            Self::One => u64::from(u8::MAX),
            Self::Two => u64::from(u16::MAX),
            Self::Four => u64::from(u32::MAX),
            Self::Eight => u64::MAX,
        }
    }

    /// Little-endian bytes of `value` in this width.
    ///
    /// The caller has already checked `value <= self.max_value()`.
    #[inline]
    pub fn encode(self, value: u64) -> impl AsRef<[u8]> {
        EncodedElem {
            bytes: value.to_le_bytes(),
            len: self.bytes(),
        }
    }

    /// Decode one element from the front of `bytes`.
    #[inline]
    pub fn decode(self, bytes: &[u8]) -> u64 {
        let mut le = [0u8; 8];
        le[..self.bytes()].copy_from_slice(&bytes[..self.bytes()]);
        u64::from_le_bytes(le)
    }
}

struct EncodedElem {
    bytes: [u8; 8],
    len: usize,
}

impl AsRef<[u8]> for EncodedElem {
    fn as_ref(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

// ============================================================================
// HEADER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntArrayHeader {
    pub count: u64,
    pub elem_width: ElemWidth,
}

impl IntArrayHeader {
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.count.to_le_bytes())?;
        w.write_all(&[self.elem_width as u8])?;
        Ok(())
    }

    /// Parse a header from the first `HEADER_SIZE` bytes of a file image.
    ///
    /// Returns the reason as a plain string so callers can attach the path.
    pub fn parse(bytes: &[u8]) -> std::result::Result<Self, String> {
        if bytes.len() < HEADER_SIZE {
            return Err(format!(
                "file is {} bytes, shorter than the {}-byte header",
                bytes.len(),
                HEADER_SIZE
            ));
        }
        let count = u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]);
        let elem_width = ElemWidth::from_byte(bytes[8])
            .ok_or_else(|| format!("invalid element width {}", bytes[8]))?;
        Ok(Self { count, elem_width })
    }

    /// Total file size this header promises, or `None` on overflow.
    pub fn expected_file_len(&self) -> Option<u64> {
        self.count
            .checked_mul(self.elem_width.bytes() as u64)?
            .checked_add(HEADER_SIZE as u64)
    }
}
