// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the corpix CLI.
//!
//! Boxed sections, aligned columns and a few semantic colours. Colour is
//! dropped when stdout is not a terminal or `NO_COLOR` is set, so piped
//! output stays plain.

use std::sync::OnceLock;

/// Width between `│` and `│`, excluding the border characters.
pub const BOX_WIDTH: usize = 72;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const GRAY: &str = "\x1b[90m";

static USE_COLORS: OnceLock<bool> = OnceLock::new();

/// Colours only on a terminal, and never with `NO_COLOR` set.
pub fn use_colors() -> bool {
    *USE_COLORS.get_or_init(|| {
        std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout)
    })
}

/// Wrap `text` in `styles` when colours are on.
pub fn styled(styles: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", styles.concat(), text, RESET)
    } else {
        text.to_string()
    }
}

fn border() -> &'static str {
    if use_colors() {
        GRAY
    } else {
        ""
    }
}

fn reset() -> &'static str {
    if use_colors() {
        RESET
    } else {
        ""
    }
}

/// Visible length, skipping ANSI escapes.
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

pub fn pad_left(s: &str, width: usize) -> String {
    format!("{}{}", " ".repeat(width.saturating_sub(visible_len(s))), s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(visible_len(s))))
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// `┌─ LABEL ─────┐`
pub fn section_top(label: &str) {
    let label_part = format!("─ {} ", styled(&[BOLD, CYAN], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}┌{}{}{}{}┐{}",
        border(),
        reset(),
        label_part,
        border(),
        "─".repeat(remaining),
        reset()
    );
}

/// `├─ LABEL ─────┤`
pub fn section_mid(label: &str) {
    let label_part = format!("─ {} ", styled(&[BOLD, CYAN], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}├{}{}{}{}┤{}",
        border(),
        reset(),
        label_part,
        border(),
        "─".repeat(remaining),
        reset()
    );
}

/// `└─────────────┘`
pub fn section_bot() {
    println!("{}└{}┘{}", border(), "─".repeat(BOX_WIDTH), reset());
}

/// `│ content     │`
pub fn row(content: &str) {
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!(
        "{}│{}{}{}{}│{}",
        border(),
        reset(),
        content,
        " ".repeat(pad),
        border(),
        reset()
    );
}

/// `│ label      value │` with the value right-aligned.
pub fn kv_row(label: &str, value: &str) {
    let label = format!(" {}", styled(&[DIM], label));
    let width = BOX_WIDTH.saturating_sub(visible_len(&label) + 1);
    row(&format!("{}{} ", label, pad_left(value, width)));
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Size of `compressed` relative to `raw`, green when smaller.
pub fn ratio_colored(raw: u64, compressed: u64) -> String {
    if raw == 0 {
        return styled(&[GRAY], "   n/a");
    }
    let pct = compressed as f64 / raw as f64 * 100.0;
    let text = format!("{:>5.1}%", pct);
    if pct < 100.0 {
        styled(&[GREEN], &text)
    } else {
        styled(&[RED], &text)
    }
}

pub fn ok_badge() -> String {
    styled(&[BOLD, GREEN], "ok")
}

pub fn fail_badge() -> String {
    styled(&[BOLD, RED], "FAIL")
}

pub fn warn(text: &str) -> String {
    styled(&[YELLOW], text)
}
