// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! String folding for search: lowercase, strip diacritics, collapse whitespace.
//!
//! Every comparison in the crate happens in folded space. Listings arrive with
//! mixed French/Arabic spellings ("Aïn El Türck", "Bir-El-Djir") and queries
//! arrive however the user felt like typing them, so both sides get folded
//! before any matching.

use unicode_normalization::UnicodeNormalization;

/// Normalize a string for search: lowercase, strip diacritics, and collapse whitespace.
///
/// This enables matching between ASCII and accented spellings:
/// - "Aïn El Türck" → "ain el turck"
/// - "pièces" → "pieces"
/// - "Sénia" → "senia"
///
/// # Algorithm
///
/// 1. NFD normalize (decompose characters into base + combining marks)
/// 2. Filter out combining marks (category Mn = Mark, Nonspacing)
/// 3. Lowercase
/// 4. Collapse whitespace
pub fn normalize(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check if a character is a combining mark (diacritic).
///
/// Combining marks have Unicode category "Mn" (Mark, Nonspacing).
/// Examples: ́ (acute), ̈ (diaeresis), ّ (shadda)
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{0610}'..='\u{061A}' |  // Arabic signs
        '\u{064B}'..='\u{065F}' |  // Arabic harakat
        '\u{0670}' |               // Arabic superscript alef
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Split a query into folded, non-empty word tokens.
///
/// Splits on anything that is not alphanumeric, so "T3, Bir-El-Djir" yields
/// `["t3", "bir", "el", "djir"]`.
pub fn tokenize(query: &str) -> Vec<String> {
    normalize(query)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Compact a folded string: drop spaces and hyphens.
///
/// "bir el djir" → "bireldjir". Listings frequently glue compound place names
/// together, so containment checks run against both shapes.
pub fn compact(value: &str) -> String {
    value.chars().filter(|c| *c != ' ' && *c != '-').collect()
}
