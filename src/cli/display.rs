// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the subtol CLI.
//!
//! Boxed sections for `inspect`, colored labels for `query`. Respects
//! `NO_COLOR` and falls back to plain text when stdout is not a terminal.

use std::io::IsTerminal;
use std::sync::OnceLock;

// Width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 64;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

// OneDark palette
pub const GREEN: &str = "\x1b[38;2;152;195;121m";
pub const YELLOW: &str = "\x1b[38;2;229;192;123m";
pub const CYAN: &str = "\x1b[38;2;86;182;194m";
pub const GRAY: &str = "\x1b[38;2;92;99;112m";
pub const RED: &str = "\x1b[38;2;224;108;117m";

static COLORS: OnceLock<bool> = OnceLock::new();

/// Check if colors should be used (TTY detection, cached)
pub fn use_colors() -> bool {
    *COLORS.get_or_init(|| std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal())
}

/// Apply styles if TTY, otherwise return plain text
pub fn styled(styles: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", styles.join(""), text, RESET)
    } else {
        text.to_string()
    }
}

/// Visible length (excluding ANSI codes)
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

/// Print section header: ┌─ LABEL ──────────┐
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

/// Print a content line: │ content          │
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

/// Print a `label  value` line inside a section
pub fn field(label: &str, value: &str) {
    row(&format!(" {:<18}{}", styled(&[DIM], label), value));
}

/// Print section footer: └──────────────────┘
pub fn section_bot() {
    println!("{}└{}┘{}", border(), "─".repeat(BOX_WIDTH), reset());
}

/// Format bytes as human-readable size
pub fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Color-coded timing value in µs (green=fast, yellow=medium, red=slow)
pub fn timing_us(value: f64) -> String {
    let color = if value < 10.0 {
        GREEN
    } else if value < 1000.0 {
        YELLOW
    } else {
        RED
    };
    styled(&[color], &format!("{:.1} µs", value))
}

/// Match count, dimmed when zero
pub fn count_label(count: usize) -> String {
    if count == 0 {
        styled(&[DIM], "no match")
    } else {
        styled(&[BOLD, GREEN], &format!("{} match{}", count, if count == 1 { "" } else { "es" }))
    }
}
