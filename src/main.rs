// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{commands, Cli, Commands};

fn init_logging() {
    let filter = EnvFilter::try_from_env("CORPIX_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Build {
            input,
            output,
            marker,
            no_blank_breaks,
            quiet,
            json,
        } => commands::run_build(&input, output.as_deref(), &marker, no_blank_breaks, quiet, json),
        Commands::Inspect {
            corpus,
            read_mode,
            json,
        } => commands::run_inspect(&corpus, read_mode, json),
        Commands::Sentence { corpus, number } => commands::run_sentence(&corpus, number),
        Commands::Delta { files, verify } => commands::run_delta(&files, verify),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
