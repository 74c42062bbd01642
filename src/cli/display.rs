// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the samsar CLI.
//!
//! OneDark for dark terminals, One Light for light ones. Detection tries
//! `SAMSAR_THEME` first, then `COLORFGBG`, then defaults to dark. Respects
//! `NO_COLOR` and non-TTY pipelines.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::presets::PresetView;
use crate::recover::RecoveryAction;
use crate::score::Candidate;
use crate::types::SearchSuggestion;

/// Width between the border characters.
pub const BOX_WIDTH: usize = 78;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("SAMSAR_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }
    // COLORFGBG is "fg;bg"; backgrounds 7+ (except 8) are light
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(bg) = colorfgbg.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                if bg_num >= 7 && bg_num != 8 {
                    return Theme::Light;
                }
            }
        }
    }
    Theme::Dark
}

pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

mod onedark {
    pub const GREEN: (u8, u8, u8) = (152, 195, 121);
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123);
    pub const BLUE: (u8, u8, u8) = (97, 175, 239);
    pub const CYAN: (u8, u8, u8) = (86, 182, 194);
    pub const GRAY: (u8, u8, u8) = (92, 99, 112);
}

mod onelight {
    pub const GREEN: (u8, u8, u8) = (80, 161, 79);
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1);
    pub const BLUE: (u8, u8, u8) = (64, 120, 242);
    pub const CYAN: (u8, u8, u8) = (1, 132, 188);
    pub const GRAY: (u8, u8, u8) = (160, 161, 167);
}

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            rgb(r, g, b)
        }
    };
}

theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(BLUE);
theme_color!(CYAN);
theme_color!(GRAY);

pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Visible length, excluding ANSI escape sequences.
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

pub fn row(content: &str) {
    let border = if use_colors() { GRAY() } else { String::new() };
    let reset = if use_colors() { RESET } else { "" };
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{border}│{reset}{content}{}{border}│{reset}", " ".repeat(pad));
}

pub fn section_top(label: &str) {
    let border = if use_colors() { GRAY() } else { String::new() };
    let reset = if use_colors() { RESET } else { "" };
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("{border}┌{reset}{label_part}{border}{}┐{reset}", "─".repeat(remaining));
}

pub fn section_bot() {
    let border = if use_colors() { GRAY() } else { String::new() };
    let reset = if use_colors() { RESET } else { "" };
    println!("{border}└{}┘{reset}", "─".repeat(BOX_WIDTH));
}

fn truncated(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// One ranked result line: rank, reference, title, location, price, score.
pub fn print_result(rank: usize, candidate: &Candidate, score: f64) {
    let listing = &candidate.listing;
    let line = format!(
        " {:>2}. {} {}  {}",
        rank,
        themed(BLUE, &[BOLD], &listing.ref_code),
        truncated(&listing.title, 34),
        themed(GRAY, &[DIM], &truncated(&listing.location, 22)),
    );
    row(&line);
    let detail = format!(
        "     {} · {} · {:.0} m² · score {}",
        themed(GREEN, &[], &listing.price),
        listing.room_label(),
        listing.area,
        themed(YELLOW, &[], &format!("{score:.1}")),
    );
    row(&detail);
}

pub fn print_suggestion(suggestion: &SearchSuggestion) {
    let facet = format!("{:?}", suggestion.facet).to_lowercase();
    let line = format!(
        " {} {}  {}",
        themed(CYAN, &[], &format!("{facet:<12}")),
        truncated(&suggestion.label, 44),
        themed(GRAY, &[DIM], &format!("({})", suggestion.match_count)),
    );
    row(&line);
}

pub fn print_preset(view: &PresetView) {
    let marker = if view.active { themed(GREEN, &[BOLD], "●") } else { " ".to_string() };
    let trend = match view.trend {
        t if t > 0 => themed(GREEN, &[], &format!("↑{t}")),
        t if t < 0 => themed(YELLOW, &[], &format!("↓{}", -t)),
        _ => themed(GRAY, &[DIM], "·"),
    };
    let line = format!(
        " {marker} {}  {} {}",
        truncated(&view.preset.label, 40),
        themed(GRAY, &[DIM], &format!("{} annonces", view.count)),
        trend,
    );
    row(&line);
}

pub fn print_recovery(action: &RecoveryAction, count: usize) {
    let line = format!(
        " → {}  {}",
        truncated(&action.label, 40),
        themed(GRAY, &[DIM], &format!("{} · {} annonces", action.hint, count)),
    );
    row(&line);
}
