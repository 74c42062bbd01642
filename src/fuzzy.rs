// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Typo tolerance: bounded edit distance with an early-exit optimization.
//!
//! The matcher tries cheap containment first (the token and all its alias
//! variants against the folded haystack) and only falls back to Levenshtein
//! when that fails. The key insight for the fallback: `|len(a) - len(b)|` is
//! a lower bound on edit distance, so word pairs whose lengths differ by more
//! than the budget are rejected before allocating anything.

use crate::alias::variants_of;
use crate::text::{compact, normalize, tokenize};

/// Minimum token length before the Levenshtein fallback kicks in.
/// Short tokens ("f3", "el") produce too many accidental one-edit neighbours.
const FUZZY_MIN_TOKEN_LEN: usize = 4;

/// Tokens shorter than this get an edit budget of 1; longer tokens get 2.
const FUZZY_WIDE_BUDGET_LEN: usize = 8;

/// Are these strings within `max` edits of each other?
///
/// Bounded Levenshtein with two early-exit paths:
/// 1. If length difference exceeds `max`, return false immediately
/// 2. If the minimum row value exceeds `max`, abandon the DP early
///
/// Both exits are sound: they can never reject a pair whose true distance is
/// within the budget.
pub fn levenshtein_within(a: &str, b: &str, max: usize) -> bool {
    // Use character counts, not byte lengths, for Unicode correctness
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    // Early-exit: length difference is a lower bound on edit distance
    if (a_len as isize - b_len as isize).unsigned_abs() > max {
        return false;
    }

    let mut dp: Vec<usize> = (0..=b_len).collect();
    for (i, ac) in a.chars().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        let mut min_row = dp[0];

        for (j, bc) in b.chars().enumerate() {
            let temp = dp[j + 1];
            let cost = if ac == bc { 0 } else { 1 };
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
            if dp[j + 1] < min_row {
                min_row = dp[j + 1];
            }
        }

        // Early-exit: if the minimum in this row exceeds max, no point continuing
        if min_row > max {
            return false;
        }
    }

    dp[b_len] <= max
}

/// Edit budget for a folded token: 1 below 8 characters, 2 from 8 up.
pub fn edit_budget(token: &str) -> usize {
    if token.chars().count() < FUZZY_WIDE_BUDGET_LEN {
        1
    } else {
        2
    }
}

/// Does `token` match anywhere in the folded `haystack`?
///
/// Two stages:
/// 1. Containment of any alias variant (including compacted forms).
/// 2. For tokens of 4+ characters, bounded Levenshtein against each haystack
///    word, budget 1 under 8 characters and 2 from 8 up.
///
/// `haystack` must already be folded (see [`crate::text::normalize`]);
/// `token` is folded here so callers can pass raw user input.
pub fn matches_text(haystack: &str, token: &str) -> bool {
    let folded = normalize(token);
    if folded.is_empty() {
        return true;
    }
    for variant in variants_of(&folded) {
        if haystack.contains(&variant) {
            return true;
        }
    }
    fuzzy_word_match(haystack, &folded)
}

/// Does `token` match the haystack without consulting the alias table?
///
/// Same containment + fuzzy staging as [`matches_text`], restricted to the
/// token itself and its compacted form. The scorer uses this to separate
/// literal matches from alias-expanded ones.
pub fn matches_text_literal(haystack: &str, token: &str) -> bool {
    let folded = normalize(token);
    if folded.is_empty() {
        return true;
    }
    if haystack.contains(&folded) || haystack.contains(&compact(&folded)) {
        return true;
    }
    fuzzy_word_match(haystack, &folded)
}

fn fuzzy_word_match(haystack: &str, folded_token: &str) -> bool {
    if folded_token.chars().count() < FUZZY_MIN_TOKEN_LEN {
        return false;
    }
    let budget = edit_budget(folded_token);
    tokenize(haystack)
        .iter()
        .any(|word| levenshtein_within(word, folded_token, budget))
}
