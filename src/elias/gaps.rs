// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Gap-coded integer sequences made of ascending runs.
//!
//! Postings lists laid end to end look like `3 7 | 2 9 | ...`: ascending
//! inside a run, arbitrary across boundaries. Inside a run each value is
//! stored as `delta(n - last + 1)`, a gap shifted by one into the code's
//! domain. A run start is stored as `delta(1)` (a gap of zero, which cannot
//! happen inside a strictly ascending run) followed by `delta(n + 1)`.
//!
//! ```text
//! values     3        7        2            9
//! emitted    δ(1) δ(4) δ(5)    δ(1) δ(3)    δ(8)
//!            └ run ┘            └ run ┘
//! ```
//!
//! A run starts at the first value, whenever `n <= last`, and wherever the
//! caller marks one with [`GapEncoder::start_run`] (e.g. from a separate
//! table of list starts).
//!
//! Decoding is strictly sequential. There is no offset index, so reaching
//! element `k` means decoding the `k` before it.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::bits::{BitReader, BitWriter};
use super::codes::{delta_decode, delta_encode};
use crate::disk::IntArray;
use crate::error::{CorpixError, Result};

/// Codeword value that opens a run.
const RUN_MARKER: u64 = 1;

// ============================================================================
// ENCODER
// ============================================================================

pub struct GapEncoder<W: Write> {
    bits: BitWriter<W>,
    last: Option<u64>,
    force_run: bool,
    values: u64,
    runs: u64,
}

impl<W: Write> GapEncoder<W> {
    pub fn new(inner: W) -> Self {
        Self {
            bits: BitWriter::new(inner),
            last: None,
            force_run: false,
            values: 0,
            runs: 0,
        }
    }

    /// Make the next pushed value open a new run even if it is larger than
    /// the previous one.
    pub fn start_run(&mut self) {
        self.force_run = true;
    }

    pub fn push(&mut self, n: u64) -> Result<()> {
        match self.last {
            Some(last) if n > last && !self.force_run => {
                let gap = (n - last)
                    .checked_add(1)
                    .ok_or(CorpixError::ValueOutOfRange {
                        value: n,
                        max_value: u64::MAX - 1,
                    })?;
                delta_encode(&mut self.bits, gap)?;
            }
            _ => {
                let shifted = n.checked_add(1).ok_or(CorpixError::ValueOutOfRange {
                    value: n,
                    max_value: u64::MAX - 1,
                })?;
                delta_encode(&mut self.bits, RUN_MARKER)?;
                delta_encode(&mut self.bits, shifted)?;
                self.runs += 1;
            }
        }
        self.last = Some(n);
        self.force_run = false;
        self.values += 1;
        Ok(())
    }

    pub fn extend<I: IntoIterator<Item = u64>>(&mut self, values: I) -> Result<()> {
        values.into_iter().try_for_each(|n| self.push(n))
    }

    /// Values pushed so far.
    pub fn len(&self) -> u64 {
        self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values == 0
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn bits_written(&self) -> u64 {
        self.bits.bits_written()
    }

    /// Pad and flush the final byte.
    pub fn finish(self) -> Result<W> {
        Ok(self.bits.finish()?)
    }
}

/// Gap-code every value of `values` into a byte vector.
pub fn encode_gap_sequence(values: &IntArray) -> Result<Vec<u8>> {
    let mut encoder = GapEncoder::new(Vec::new());
    encoder.extend(values.iter())?;
    encoder.finish()
}

/// Gap-code explicit runs, marking every boundary even where values ascend.
pub fn encode_gap_runs<R: AsRef<[u64]>>(runs: &[R]) -> Result<Vec<u8>> {
    let mut encoder = GapEncoder::new(Vec::new());
    for run in runs {
        encoder.start_run();
        encoder.extend(run.as_ref().iter().copied())?;
    }
    encoder.finish()
}

/// Stream the gap coding of `values` into `writer`. Returns the number of
/// bytes written.
pub fn write_delta_coded_array<W: Write>(writer: W, values: &IntArray) -> Result<u64> {
    let mut encoder = GapEncoder::new(writer);
    encoder.extend(values.iter())?;
    let bytes = encoder.bits_written().div_ceil(8);
    encoder.finish()?;
    Ok(bytes)
}

/// Output path for a delta-coded copy of an array: `X.ia` becomes `X.delta`,
/// anything else gets `.delta` appended.
pub fn delta_path(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "ia") {
        path.with_extension("delta")
    } else {
        crate::disk::with_suffix(path, ".delta")
    }
}

// ============================================================================
// DECODER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapValue {
    pub value: u64,
    /// True for the first value of a run.
    pub run_start: bool,
}

/// Iterates decoded values until only padding is left.
pub struct GapDecoder<'a> {
    bits: BitReader<'a>,
    last: Option<u64>,
    failed: bool,
}

impl<'a> GapDecoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bits: BitReader::new(bytes),
            last: None,
            failed: false,
        }
    }

    fn corrupt(&self, bit_offset: u64, reason: &str) -> CorpixError {
        CorpixError::CorruptStream {
            bit_offset,
            reason: reason.to_string(),
        }
    }

    fn next_value(&mut self) -> Result<Option<GapValue>> {
        let start = self.bits.position();
        let Some(code) = delta_decode(&mut self.bits)? else {
            return Ok(None);
        };

        let decoded = if code == RUN_MARKER {
            let shifted = delta_decode(&mut self.bits)?
                .ok_or_else(|| self.corrupt(start, "run marker without a value"))?;
            GapValue {
                value: shifted - 1,
                run_start: true,
            }
        } else {
            let last = self
                .last
                .ok_or_else(|| self.corrupt(start, "gap before the first run"))?;
            let value = last
                .checked_add(code - 1)
                .ok_or_else(|| self.corrupt(start, "gap overflows u64"))?;
            GapValue {
                value,
                run_start: false,
            }
        };

        self.last = Some(decoded.value);
        Ok(Some(decoded))
    }
}

impl Iterator for GapDecoder<'_> {
    type Item = Result<GapValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_value().transpose();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

/// Decode a whole stream into its runs.
///
/// A stream cut inside a codeword is reported as `CorruptStream`. A cut
/// that falls exactly on a codeword boundary leaves a valid shorter stream
/// and cannot be detected.
pub fn decode_gap_sequence(bytes: &[u8]) -> Result<Vec<Vec<u64>>> {
    let mut runs: Vec<Vec<u64>> = Vec::new();
    for item in GapDecoder::new(bytes) {
        let GapValue { value, run_start } = item?;
        match runs.last_mut() {
            Some(run) if !run_start => run.push(value),
            _ => runs.push(vec![value]),
        }
    }
    Ok(runs)
}
