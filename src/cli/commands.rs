// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Subcommand implementations.
//!
//! Thin wrappers: every operation lives in the library, these only pick
//! paths, call it, and print.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use corpix::{
    build_corpus_file, decode_gap_sequence, default_corpus_dir, delta_path, verify_corpus,
    write_delta_coded_array, BuildOptions, Corpus, CorpixError, IntArray, InvariantViolation,
    ReadMode, Result,
};
use serde::Serialize;
use tracing::info;

use super::display::*;

/// A path to an existing directory is the corpus; anything else is taken as
/// the token file it was built from.
fn resolve_corpus_dir(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        default_corpus_dir(path)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BUILD
// ═══════════════════════════════════════════════════════════════════════════

pub fn run_build(
    input: &Path,
    output: Option<&Path>,
    marker: &str,
    no_blank_breaks: bool,
    quiet: bool,
    json: bool,
) -> Result<()> {
    let options = BuildOptions {
        sentence_marker: marker.as_bytes().to_vec(),
        blank_line_breaks: !no_blank_breaks,
        show_progress: !quiet && atty::is(atty::Stream::Stderr),
    };
    let summary = build_corpus_file(input, output, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    eprintln!();
    eprintln!("✅ Built {}", summary.path.display());
    eprintln!(
        "   {} features │ {} tokens │ {} sentences",
        summary.features.len(),
        summary.tokens,
        summary.sentences
    );
    for feature in &summary.features {
        eprintln!("   {:<16} {:>10} distinct", feature.name, feature.distinct);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECT
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct FeatureReport {
    name: String,
    distinct: usize,
    id_width: usize,
}

#[derive(Serialize)]
struct FileReport {
    name: String,
    bytes: u64,
    crc32: String,
}

#[derive(Serialize)]
struct InspectReport {
    name: String,
    path: PathBuf,
    tokens: usize,
    sentences: usize,
    features: Vec<FeatureReport>,
    files: Vec<FileReport>,
    violations: Vec<InvariantViolation>,
}

fn inspect_report(corpus: &Corpus) -> Result<InspectReport> {
    let features = corpus
        .features()
        .iter()
        .map(|name| {
            let column = corpus.feature(name)?;
            Ok(FeatureReport {
                name: name.clone(),
                distinct: column.pool().len(),
                id_width: column.ids().elem_width().bytes(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut files = Vec::new();
    for entry in fs::read_dir(corpus.path())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let bytes = fs::read(entry.path())?;
        files.push(FileReport {
            name: entry.file_name().to_string_lossy().into_owned(),
            bytes: bytes.len() as u64,
            crc32: format!("{:08x}", crc32fast::hash(&bytes)),
        });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(InspectReport {
        name: corpus.name(),
        path: corpus.path().to_path_buf(),
        tokens: corpus.num_words(),
        sentences: corpus.num_sentences(),
        features,
        files,
        violations: verify_corpus(corpus)?,
    })
}

pub fn run_inspect(path: &Path, mode: ReadMode, json: bool) -> Result<()> {
    let corpus = Corpus::open(resolve_corpus_dir(path), mode)?;
    let report = inspect_report(&corpus)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    section_top(&corpus.to_string());
    kv_row("path", &report.path.display().to_string());
    kv_row("tokens", &report.tokens.to_string());
    kv_row("sentences", &report.sentences.to_string());

    section_mid("FEATURES");
    for feature in &report.features {
        row(&format!(
            " {} {} {}",
            pad_right(&styled(&[BOLD], &feature.name), 24),
            pad_left(&format!("{} distinct", feature.distinct), 20),
            pad_left(&format!("{}-byte ids", feature.id_width), 14),
        ));
    }

    section_mid("FILES");
    let total: u64 = report.files.iter().map(|f| f.bytes).sum();
    for file in &report.files {
        row(&format!(
            " {} {} {}",
            pad_right(&file.name, 36),
            pad_left(&format_size(file.bytes), 12),
            styled(&[GRAY], &file.crc32),
        ));
    }
    kv_row("total", &format_size(total));

    section_mid("INVARIANTS");
    if report.violations.is_empty() {
        row(&format!(" {} all invariants hold", ok_badge()));
    } else {
        for violation in &report.violations {
            row(&format!(" {} {}", fail_badge(), violation));
        }
    }
    section_bot();

    if report.violations.is_empty() {
        Ok(())
    } else {
        Err(CorpixError::CorruptFile {
            path: report.path,
            reason: format!("{} invariant violations", report.violations.len()),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SENTENCE
// ═══════════════════════════════════════════════════════════════════════════

pub fn run_sentence(path: &Path, number: usize) -> Result<()> {
    let corpus = Corpus::open(resolve_corpus_dir(path), ReadMode::Mmap)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", styled(&[DIM], &format!("# {}", corpus.features().join("\t"))))?;
    for word in corpus.sentence(number)? {
        let values = word
            .items()
            .map(|item| item.map(|(_, value)| String::from_utf8_lossy(value).into_owned()))
            .collect::<Result<Vec<_>>>()?;
        writeln!(out, "{}", values.join("\t"))?;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// DELTA
// ═══════════════════════════════════════════════════════════════════════════

fn brotli_size(bytes: &[u8]) -> Result<u64> {
    let mut compressed = Vec::new();
    {
        let mut encoder = brotli::CompressorWriter::new(&mut compressed, 4096, 11, 22);
        encoder.write_all(bytes)?;
    }
    Ok(compressed.len() as u64)
}

fn delta_one(path: &Path, verify: bool) -> Result<bool> {
    let array = IntArray::open(path, ReadMode::Mmap)?;
    let out_path = delta_path(path);

    let mut writer = BufWriter::new(File::create(&out_path)?);
    let elias = write_delta_coded_array(&mut writer, &array)?;
    writer.flush()?;
    drop(writer);

    let raw = array.byte_len() as u64;
    let brotli = brotli_size(array.as_bytes())?;
    info!(path = %path.display(), raw, elias, brotli, "delta coded");

    println!(
        "{}  {} raw  {} elias {}  {} brotli {}",
        pad_right(&out_path.display().to_string(), 32),
        pad_left(&format_size(raw), 10),
        pad_left(&format_size(elias), 10),
        ratio_colored(raw, elias),
        pad_left(&format_size(brotli), 10),
        ratio_colored(raw, brotli),
    );

    if !verify {
        return Ok(true);
    }
    let decoded: Vec<u64> = decode_gap_sequence(&fs::read(&out_path)?)?
        .into_iter()
        .flatten()
        .collect();
    let matches = decoded == array.to_vec();
    if matches {
        println!("   {} {} values round-trip", ok_badge(), decoded.len());
    } else {
        println!(
            "   {} decoded {} values, expected {}",
            fail_badge(),
            decoded.len(),
            array.len()
        );
    }
    Ok(matches)
}

pub fn run_delta(files: &[PathBuf], verify: bool) -> Result<()> {
    let mut failed = 0usize;
    for path in files {
        if !delta_one(path, verify)? {
            failed += 1;
        }
    }
    if failed > 0 {
        eprintln!("{}", warn(&format!("{} of {} files failed verification", failed, files.len())));
        return Err(CorpixError::CorruptStream {
            bit_offset: 0,
            reason: "decoded values differ from the input".to_string(),
        });
    }
    Ok(())
}
