// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the corpix command-line interface.
//!
//! Four subcommands: `build` turns a token file into a corpus directory,
//! `inspect` reports on one, `sentence` prints a sentence, and `delta`
//! Elias-codes integer array files and compares sizes.

pub mod commands;
pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use corpix::ReadMode;

#[derive(Parser)]
#[command(
    name = "corpix",
    about = "Columnar corpus storage with Elias-coded integer sequences",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a corpus directory from a tab-separated token file
    Build {
        /// Token file; the first line names the features
        input: PathBuf,

        /// Output directory (default: INPUT with extension .corpus)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Lines starting with this text end a sentence
        #[arg(long, default_value = "# sentence")]
        marker: String,

        /// Do not treat blank lines as sentence breaks
        #[arg(long)]
        no_blank_breaks: bool,

        /// No progress spinners
        #[arg(short, long)]
        quiet: bool,

        /// Print the build summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Show features, sizes and invariant checks for a corpus
    Inspect {
        /// Corpus directory, or the token file it was built from
        corpus: PathBuf,

        #[arg(long, value_enum, default_value_t = ReadMode::Mmap)]
        read_mode: ReadMode,

        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Print one sentence, a token per line
    Sentence {
        /// Corpus directory, or the token file it was built from
        corpus: PathBuf,

        /// Sentence number, starting at 1
        number: usize,
    },

    /// Elias-delta-code integer array files (X.ia becomes X.delta)
    Delta {
        /// IntArray files to encode
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Decode each output and compare it with the input
        #[arg(long)]
        verify: bool,
    },
}
