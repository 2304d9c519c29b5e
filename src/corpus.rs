// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Read-only view of a built corpus.
//!
//! ```text
//! NAME.corpus/
//! ├── features                 JSON list of feature names
//! ├── sentences                IntArray: [0, start₁, start₂, ...]
//! ├── feature.word             IntArray of pool ids, one per token
//! ├── feature.word.strings     pool blob
//! ├── feature.word.starts      pool offsets
//! └── feature.<name>...        same triple for every other feature
//! ```
//!
//! Sentences are numbered from 1; entry 0 of `sentences` is a sentinel.
//! Sentence `i` covers tokens `sentences[i] .. sentences[i + 1]`, and the
//! last one runs to the end of the token stream.
//!
//! Everything here is a pure read over immutable files. A `Corpus` can be
//! shared across threads without locking.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::disk::{IntArray, ReadMode, StringArray};
use crate::error::{CorpixError, Result};

/// Feature-name list file inside a corpus directory.
pub const FEATURES_FILE: &str = "features";
/// Sentence-start array inside a corpus directory.
pub const SENTENCES_FILE: &str = "sentences";
/// Extension of a corpus directory (`NAME.csv` builds `NAME.corpus`).
pub const CORPUS_EXTENSION: &str = "corpus";

/// Path of the string column for `feature` inside `dir`.
pub fn feature_path(dir: &Path, feature: &str) -> PathBuf {
    dir.join(format!("feature.{}", feature))
}

#[derive(Debug)]
pub struct Corpus {
    path: PathBuf,
    features: Vec<String>,
    sentences: IntArray,
    /// One column per feature, in `features` order.
    columns: Vec<StringArray>,
}

impl Corpus {
    /// Open the corpus directory at `dir`.
    pub fn open(dir: impl AsRef<Path>, mode: ReadMode) -> Result<Self> {
        let path = dir.as_ref().to_path_buf();

        let features: Vec<String> =
            serde_json::from_reader(BufReader::new(File::open(path.join(FEATURES_FILE))?))?;
        if features.is_empty() {
            return Err(CorpixError::CorruptFile {
                path: path.join(FEATURES_FILE),
                reason: "no features declared".to_string(),
            });
        }

        let sentences = IntArray::open(path.join(SENTENCES_FILE), mode)?;
        let columns = features
            .iter()
            .map(|name| StringArray::open(feature_path(&path, name), mode))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            path = %path.display(),
            features = features.len(),
            sentences = sentences.len().saturating_sub(1),
            ?mode,
            "corpus opened"
        );

        Ok(Self {
            path,
            features,
            sentences,
            columns,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name without the `.corpus` extension.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// The raw sentence-start array, sentinel included.
    pub fn sentence_starts(&self) -> &IntArray {
        &self.sentences
    }

    pub fn num_sentences(&self) -> usize {
        self.sentences.len().saturating_sub(1)
    }

    pub fn num_words(&self) -> usize {
        self.columns.first().map_or(0, StringArray::len)
    }

    /// Column for `feature`.
    pub fn feature(&self, feature: &str) -> Result<&StringArray> {
        self.feature_index(feature).map(|i| &self.columns[i])
    }

    fn feature_index(&self, feature: &str) -> Result<usize> {
        self.features
            .iter()
            .position(|f| f == feature)
            .ok_or_else(|| CorpixError::UnknownFeature {
                feature: feature.to_string(),
            })
    }

    /// Pool identifier of `value` in `feature`, for id-level comparisons.
    pub fn intern(&self, feature: &str, value: impl AsRef<[u8]>) -> Result<u64> {
        self.feature(feature)?.intern(value)
    }

    /// Token positions of sentence `n` (1-based).
    pub fn sentence_range(&self, n: usize) -> Result<Range<usize>> {
        if n == 0 || n >= self.sentences.len() {
            return Err(CorpixError::IndexOutOfBounds {
                index: n as u64,
                len: self.sentences.len() as u64,
            });
        }
        let start = self.sentences.get(n)? as usize;
        let end = if n + 1 < self.sentences.len() {
            self.sentences.get(n + 1)? as usize
        } else {
            self.num_words()
        };
        Ok(start..end)
    }

    /// Words of sentence `n` (1-based), in order.
    pub fn sentence(&self, n: usize) -> Result<Vec<Word<'_>>> {
        Ok(self
            .sentence_range(n)?
            .map(|pos| Word { corpus: self, pos })
            .collect())
    }

    /// Every sentence from 1 to `num_sentences()`.
    pub fn sentences(&self) -> impl Iterator<Item = Result<Vec<Word<'_>>>> + '_ {
        (1..=self.num_sentences()).map(move |n| self.sentence(n))
    }

    pub fn word(&self, pos: usize) -> Result<Word<'_>> {
        if pos >= self.num_words() {
            return Err(CorpixError::IndexOutOfBounds {
                index: pos as u64,
                len: self.num_words() as u64,
            });
        }
        Ok(Word { corpus: self, pos })
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Corpus: {}]", self.name())
    }
}

/// One token position in a corpus. Values are resolved on every access.
#[derive(Clone, Copy)]
pub struct Word<'c> {
    corpus: &'c Corpus,
    pos: usize,
}

impl<'c> Word<'c> {
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn corpus(&self) -> &'c Corpus {
        self.corpus
    }

    /// Value of `feature` at this position.
    pub fn get(&self, feature: &str) -> Result<&'c [u8]> {
        self.corpus.feature(feature)?.get(self.pos)
    }

    /// Pool identifier of `feature` at this position.
    pub fn id(&self, feature: &str) -> Result<u64> {
        self.corpus.feature(feature)?.id(self.pos)
    }

    /// `(feature, value)` pairs in feature order.
    pub fn items(&self) -> impl Iterator<Item = Result<(&'c str, &'c [u8])>> + 'c {
        let pos = self.pos;
        self.corpus
            .features
            .iter()
            .zip(&self.corpus.columns)
            .map(move |(name, column)| column.get(pos).map(|value| (name.as_str(), value)))
    }

    fn value_map(&self) -> Option<BTreeMap<&'c str, &'c [u8]>> {
        self.items().collect::<Result<_>>().ok()
    }
}

/// Words are equal when they carry the same feature values, wherever they
/// come from.
impl PartialEq for Word<'_> {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self.corpus, other.corpus) && self.pos == other.pos {
            return true;
        }
        match (self.value_map(), other.value_map()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Word<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.items().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match item {
                Ok((name, value)) => write!(f, "{}: {}", name, String::from_utf8_lossy(value))?,
                Err(_) => write!(f, "<unreadable>")?,
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for Word<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word@{}{}", self.pos, self)
    }
}
