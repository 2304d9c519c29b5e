// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Token-stream grammar.
//!
//! ```text
//! word    lemma   pos          ← header: feature names, whitespace separated
//! # sentence                   ← break marker
//! The     the     ART          ← one token per line, fields split on '\t'
//! cats    cat                  ← short row: missing fields read as ""
//!                              ← blank line: break (unless disabled)
//! ```
//!
//! Every line is trimmed of surrounding ASCII whitespace before anything
//! else looks at it, so trailing tabs and indented markers are harmless.
//!
//! Both build passes read the same stream through [`SourceReader`], so they
//! agree on every break and every field by construction.

use std::collections::HashSet;
use std::io::BufRead;

use crate::disk::{STARTS_SUFFIX, STRINGS_SUFFIX};
use crate::error::{CorpixError, Result};

/// Break marker written by the usual corpus converters.
pub const DEFAULT_SENTENCE_MARKER: &[u8] = b"# sentence";

/// One parsed source line after the header.
#[derive(Debug, PartialEq, Eq)]
pub enum Record<'a> {
    Break,
    /// Exactly one value per declared feature.
    Token(Vec<&'a [u8]>),
}

/// Read the header line and return the feature names in column order.
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<Vec<String>> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Err(malformed("source is empty"));
    }
    parse_header(line.trim_ascii())
}

pub fn parse_header(line: &[u8]) -> Result<Vec<String>> {
    let text = std::str::from_utf8(line).map_err(|e| malformed(format!("not UTF-8: {}", e)))?;

    let features: Vec<String> = text.split_ascii_whitespace().map(str::to_string).collect();
    if features.is_empty() {
        return Err(malformed("no feature names"));
    }

    let mut seen = HashSet::new();
    for name in &features {
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(malformed(format!("{:?} cannot be used as a file name", name)));
        }
        if !seen.insert(name.as_str()) {
            return Err(malformed(format!("feature {:?} declared twice", name)));
        }
    }

    // `feature.<a>.strings` is both a's pool blob and the column of feature "a.strings".
    for name in &features {
        for suffix in [STRINGS_SUFFIX, STARTS_SUFFIX] {
            if let Some(owner) = name.strip_suffix(suffix).filter(|o| seen.contains(o)) {
                return Err(malformed(format!(
                    "feature {:?} collides with the pool files of {:?}",
                    name, owner
                )));
            }
        }
    }
    Ok(features)
}

fn malformed(reason: impl Into<String>) -> CorpixError {
    CorpixError::MalformedHeader {
        reason: reason.into(),
    }
}

/// Split a token line into exactly `expected` fields.
///
/// Missing trailing fields are padded with `b""`. Surplus fields are an error.
pub fn split_fields(line: &[u8], expected: usize, line_no: usize) -> Result<Vec<&[u8]>> {
    let mut fields: Vec<&[u8]> = line.split(|&b| b == b'\t').collect();
    if fields.len() > expected {
        return Err(CorpixError::MalformedRow {
            line: line_no,
            fields: fields.len(),
            expected,
        });
    }
    fields.resize(expected, b"");
    Ok(fields)
}

/// Streams records from the lines following the header.
///
/// Not an `Iterator`: each record borrows the reader's line buffer.
pub struct SourceReader<'m, R> {
    reader: R,
    line: Vec<u8>,
    line_no: usize,
    num_features: usize,
    marker: &'m [u8],
    blank_line_breaks: bool,
}

impl<'m, R: BufRead> SourceReader<'m, R> {
    /// `reader` must be positioned just past the header line.
    pub fn new(reader: R, num_features: usize, marker: &'m [u8], blank_line_breaks: bool) -> Self {
        Self {
            reader,
            line: Vec::new(),
            line_no: 1,
            num_features,
            marker,
            blank_line_breaks,
        }
    }

    /// Next record, or `None` at end of input.
    pub fn next_record(&mut self) -> Result<Option<Record<'_>>> {
        self.line.clear();
        if self.reader.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        let line = self.line.trim_ascii();
        if (!self.marker.is_empty() && line.starts_with(self.marker))
            || (self.blank_line_breaks && line.is_empty())
        {
            return Ok(Some(Record::Break));
        }
        split_fields(line, self.num_features, self.line_no).map(|f| Some(Record::Token(f)))
    }

    /// 1-based number of the last line read (the header is line 1).
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
