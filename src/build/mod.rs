// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Two-pass corpus build.
//!
//! ```text
//! source ──pass 1──▶ Vocabulary ──▶ one StringPool per feature (parallel)
//!    │                                      │
//!    └─────pass 2──▶ sentences IntArray ◀───┤
//!                    feature.<name> ids ◀───┘
//! ```
//!
//! Pass 1 has to see every value before any column is opened, because pool
//! identifiers are ranks in the complete sorted value set. Pass 2 then
//! re-reads the source and writes token values in their original order.
//!
//! Everything is written into `NAME.corpus.partial` and renamed into place
//! only after every builder has closed. An older corpus at the target is
//! first renamed to `NAME.corpus.old` and deleted once the new one is in
//! place, so a failed build or a failed swap leaves it intact.

pub mod source;
pub mod vocabulary;

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use crate::corpus::{feature_path, CORPUS_EXTENSION, FEATURES_FILE, SENTENCES_FILE};
use crate::disk::{with_suffix, IntArrayBuilder, ReadMode, StringArrayBuilder};
use crate::error::{CorpixError, Result};

pub use source::{
    parse_header, read_header, split_fields, Record, SourceReader, DEFAULT_SENTENCE_MARKER,
};
pub use vocabulary::{collect_vocabulary, Vocabulary};

/// Suffix of the staging directory a build writes into.
pub const STAGING_SUFFIX: &str = ".partial";

/// Suffix the previous corpus is moved to while the new one is renamed in.
pub const BACKUP_SUFFIX: &str = ".old";

/// Tunables for [`build_corpus`].
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// A line starting with these bytes ends the current sentence.
    pub sentence_marker: Vec<u8>,
    /// Treat empty lines as sentence breaks too.
    pub blank_line_breaks: bool,
    /// Draw progress spinners on stderr.
    pub show_progress: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            sentence_marker: DEFAULT_SENTENCE_MARKER.to_vec(),
            blank_line_breaks: true,
            show_progress: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub name: String,
    /// Distinct values, i.e. the pool size.
    pub distinct: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub path: PathBuf,
    pub features: Vec<FeatureSummary>,
    pub tokens: u64,
    pub sentences: u64,
}

/// `NAME.csv` (or any other extension) builds into `NAME.corpus`.
pub fn default_corpus_dir(input: &Path) -> PathBuf {
    input.with_extension(CORPUS_EXTENSION)
}

/// Build a corpus from the file at `input` into `output`, or into
/// [`default_corpus_dir`] when `output` is `None`.
pub fn build_corpus_file(
    input: &Path,
    output: Option<&Path>,
    options: &BuildOptions,
) -> Result<BuildSummary> {
    let target = output.map_or_else(|| default_corpus_dir(input), Path::to_path_buf);
    let reader = BufReader::new(File::open(input)?);
    build_corpus(reader, &target, options)
}

/// Build a corpus from `reader` into the directory `target`.
///
/// The reader is rewound before each pass, so it may be positioned anywhere.
/// An existing corpus at `target` is replaced only if the build succeeds.
pub fn build_corpus<R: BufRead + Seek>(
    mut reader: R,
    target: &Path,
    options: &BuildOptions,
) -> Result<BuildSummary> {
    let staging = with_suffix(target, STAGING_SUFFIX);
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    let result = write_corpus(&mut reader, &staging, options).and_then(|summary| {
        publish(&staging, target)?;
        Ok(summary)
    });

    match result {
        Ok(mut summary) => {
            summary.path = target.to_path_buf();
            info!(path = %target.display(), "corpus published");
            Ok(summary)
        }
        Err(e) => {
            if let Err(cleanup) = fs::remove_dir_all(&staging) {
                debug!(path = %staging.display(), error = %cleanup, "staging cleanup failed");
            }
            Err(e)
        }
    }
}

/// Swap `staging` in for `target`. The previous corpus is moved aside first
/// and put back if the final rename fails.
fn publish(staging: &Path, target: &Path) -> Result<()> {
    if !target.exists() {
        fs::rename(staging, target)?;
        return Ok(());
    }

    let backup = with_suffix(target, BACKUP_SUFFIX);
    if backup.exists() {
        fs::remove_dir_all(&backup)?;
    }
    fs::rename(target, &backup)?;
    if let Err(e) = fs::rename(staging, target) {
        if let Err(restore) = fs::rename(&backup, target) {
            debug!(path = %backup.display(), error = %restore, "restoring previous corpus failed");
        }
        return Err(e.into());
    }
    if let Err(e) = fs::remove_dir_all(&backup) {
        debug!(path = %backup.display(), error = %e, "removing previous corpus failed");
    }
    Ok(())
}

fn write_corpus<R: BufRead + Seek>(
    reader: &mut R,
    dir: &Path,
    options: &BuildOptions,
) -> Result<BuildSummary> {
    // Pass 1: vocabulary
    let t0 = Instant::now();
    reader.rewind()?;
    let features = read_header(reader)?;
    let mut source = SourceReader::new(
        &mut *reader,
        features.len(),
        &options.sentence_marker,
        options.blank_line_breaks,
    );

    let progress = Progress::new(options.show_progress, "Interning");
    let vocabulary = collect_vocabulary(&mut source, Vocabulary::new(features.len()), |n| {
        progress.tick(n)
    })?;
    let tokens = vocabulary.tokens();
    let feature_summaries: Vec<FeatureSummary> = features
        .iter()
        .enumerate()
        .map(|(i, name)| FeatureSummary {
            name: name.clone(),
            distinct: vocabulary.distinct(i),
        })
        .collect();
    progress.finish(format!("{} strings", vocabulary.total_strings()));
    info!(
        strings = vocabulary.total_strings(),
        tokens,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "interned strings"
    );

    let pools = vocabulary.into_pools(dir, &features, ReadMode::Mmap)?;

    // Pass 2: arrays
    let t0 = Instant::now();
    let mut sentences = IntArrayBuilder::new(dir.join(SENTENCES_FILE), tokens.saturating_sub(1))?;
    let mut columns = features
        .iter()
        .zip(pools)
        .map(|(name, pool)| StringArrayBuilder::new(feature_path(dir, name), pool))
        .collect::<Result<Vec<_>>>()?;

    reader.rewind()?;
    read_header(reader)?;
    let mut source = SourceReader::new(
        &mut *reader,
        features.len(),
        &options.sentence_marker,
        options.blank_line_breaks,
    );

    // Sentence 0 does not exist.
    sentences.append(0)?;

    let progress = Progress::new(options.show_progress, "Writing");
    let mut position = 0u64;
    let mut num_sentences = 0u64;
    let mut at_break = true;
    while let Some(record) = source.next_record()? {
        match record {
            Record::Break => at_break = true,
            Record::Token(fields) => {
                if at_break {
                    sentences.append(position)?;
                    num_sentences += 1;
                    at_break = false;
                }
                for (column, value) in columns.iter_mut().zip(fields) {
                    column.append(value)?;
                }
                position += 1;
                progress.tick(position);
            }
        }
    }

    if position != tokens {
        return Err(CorpixError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "source changed between passes: {} tokens, then {}",
                tokens, position
            ),
        )));
    }

    sentences.close()?;
    for column in &mut columns {
        column.close()?;
    }

    let mut meta = BufWriter::new(File::create(dir.join(FEATURES_FILE))?);
    serde_json::to_writer(&mut meta, &features)?;
    meta.flush()?;

    progress.finish(format!("{} tokens, {} sentences", position, num_sentences));
    info!(
        tokens = position,
        sentences = num_sentences,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "built corpus arrays"
    );

    Ok(BuildSummary {
        path: dir.to_path_buf(),
        features: feature_summaries,
        tokens: position,
        sentences: num_sentences,
    })
}

/// Stderr spinner, drawn only with the `parallel` feature and when asked for.
struct Progress {
    #[cfg(feature = "parallel")]
    bar: Option<ProgressBar>,
}

impl Progress {
    #[cfg(feature = "parallel")]
    fn new(enabled: bool, prefix: &'static str) -> Self {
        let bar = enabled.then(|| {
            let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:<10} {pos} tokens {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            let bar = ProgressBar::new_spinner().with_style(style).with_prefix(prefix);
            bar.enable_steady_tick(std::time::Duration::from_millis(100));
            bar
        });
        Self { bar }
    }

    #[cfg(not(feature = "parallel"))]
    fn new(_enabled: bool, _prefix: &'static str) -> Self {
        Self {}
    }

    #[cfg(feature = "parallel")]
    fn tick(&self, tokens: u64) {
        if let Some(bar) = &self.bar {
            if tokens % 4096 == 0 {
                bar.set_position(tokens);
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn tick(&self, _tokens: u64) {}

    #[cfg(feature = "parallel")]
    fn finish(&self, message: String) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message);
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn finish(&self, _message: String) {}
}
