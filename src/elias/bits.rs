// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! MSB-first bit packing.
//!
//! Bits fill each byte from the high end down. The last partial byte is
//! padded with zeros in its low-order positions, and there is no length
//! prefix: the reader has to know when to stop.

use std::io::{self, Write};

/// Packs bits into bytes and streams whole bytes to `W`.
pub struct BitWriter<W: Write> {
    inner: W,
    current: u8,
    used: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            current: 0,
            used: 0,
            bits_written: 0,
        }
    }

    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.current |= u8::from(bit) << (7 - self.used);
        self.used += 1;
        self.bits_written += 1;
        if self.used == 8 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.used = 0;
        }
        Ok(())
    }

    /// Write the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u64, count: u32) -> io::Result<()> {
        debug_assert!(count <= 64);
        for i in (0..count).rev() {
            self.write_bit((value >> i) & 1 == 1)?;
        }
        Ok(())
    }

    pub fn write_zeros(&mut self, count: u32) -> io::Result<()> {
        for _ in 0..count {
            self.write_bit(false)?;
        }
        Ok(())
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pad the tail byte with zeros, flush, and hand back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if self.used > 0 {
            self.inner.write_all(&[self.current])?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Reads bits back out of a packed byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    pos: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Next bit, or `None` at the end of the slice.
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        let byte = *self.bytes.get((self.pos / 8) as usize)?;
        let bit = (byte >> (7 - (self.pos % 8))) & 1 == 1;
        self.pos += 1;
        Some(bit)
    }

    /// Next `count` bits as an integer, most significant first.
    pub fn read_bits(&mut self, count: u32) -> Option<u64> {
        debug_assert!(count <= 64);
        if self.remaining() < u64::from(count) {
            return None;
        }
        let mut value = 0u64;
        for _ in 0..count {
            // Checked above: every read lands inside the slice.
            value = (value << 1) | u64::from(self.read_bit()?);
        }
        Some(value)
    }

    /// Bit offset of the next read.
    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn remaining(&self) -> u64 {
        (self.bytes.len() as u64 * 8).saturating_sub(self.pos)
    }
}
