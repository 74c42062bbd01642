// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Free-text query → structured filter state.
//!
//! A query like "location F3 sans ascenseur max 4.5M bir el djir" carries
//! five separate cues: transaction, room count, a negated amenity, a price
//! bound and a commune. Each extraction pass runs independently over the
//! folded query and folds its finding into a copy of the current filters.
//! The merge is non-destructive: a field is only written when the extracted
//! value differs from what is already there, and fields without a cue are
//! left alone.

use crate::fuzzy::matches_text;
use crate::location::LocationHints;
use crate::facets::FacetCatalogue;
use crate::text::normalize;
use crate::types::{AmenityKey, Filters, TransactionKind};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Negation prefixes recognized immediately before an amenity cue.
const NEGATION_PREFIXES: [&str; 6] = ["sans", "without", "no", "pas de", "بدون", "بلا"];

/// Specific rental sub-types are scanned before the generic kinds so that
/// "location par mois" resolves to monthly rather than plain rent.
const TRANSACTION_SCAN_ORDER: [TransactionKind; 7] = [
    TransactionKind::RentMonthly,
    TransactionKind::RentSixMonths,
    TransactionKind::RentTwelveMonths,
    TransactionKind::RentNightly,
    TransactionKind::RentShortStay,
    TransactionKind::Rent,
    TransactionKind::Sale,
];

fn rooms_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([tf])([1-9])(\+)?\b").unwrap())
}

fn pieces_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([1-9])\s*(?:pieces?|rooms?)\b").unwrap())
}

fn area_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(min|max)\s+([0-9]+(?:[.,][0-9]+)?)\s*m2\b").unwrap())
}

fn price_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(min|max)\s+([0-9][0-9 .,]*)\s*(m\b|millions?\b)?").unwrap()
    })
}

/// Result of intent extraction: the merged filter state plus the amenities
/// the query explicitly negated.
#[derive(Debug, Clone)]
pub struct ExtractedIntent {
    pub filters: Filters,
    pub negated: BTreeSet<AmenityKey>,
}

/// Scan `query` for structured cues and merge them into `current`.
pub fn extract_intent(
    query: &str,
    current: &Filters,
    facets: &FacetCatalogue,
    hints: &LocationHints,
) -> ExtractedIntent {
    let folded = normalize(query);
    let mut filters = current.clone();
    filters.query = query.to_string();
    let mut negated = BTreeSet::new();

    if folded.is_empty() {
        return ExtractedIntent { filters, negated };
    }

    // (a)+(b) amenity cues, negated ones first so they win over inclusion
    for key in AmenityKey::ALL {
        let mut is_negated = false;
        for cue in key.cue_terms() {
            for prefix in NEGATION_PREFIXES {
                if folded.contains(&format!("{prefix} {cue}")) {
                    is_negated = true;
                }
            }
        }
        if is_negated {
            negated.insert(key);
            filters.excluded_amenities.insert(key);
            filters.included_amenities.remove(&key);
        } else if key.cue_terms().iter().any(|cue| folded.contains(cue)) {
            filters.included_amenities.insert(key);
        }
    }

    // (c) room tokens: "F3", "t2+", "Studio", "3 pieces"
    if let Some(caps) = rooms_re().captures(&folded) {
        let token = format!(
            "{}{}{}",
            caps[1].to_uppercase(),
            &caps[2],
            caps.get(3).map_or("", |_| "+")
        );
        if filters.rooms != token {
            filters.rooms = token;
        }
    } else if let Some(caps) = pieces_re().captures(&folded) {
        let token = format!("F{}", &caps[1]);
        if filters.rooms != token {
            filters.rooms = token;
        }
    } else if folded.split_whitespace().any(|w| w == "studio") && filters.rooms != "Studio" {
        filters.rooms = "Studio".to_string();
    }

    // (d) bounded numeric cues. Area first ("max 120 m2"), then the area
    // spans are blanked out so the price scan cannot re-read them.
    let mut without_areas = folded.clone();
    for caps in area_re().captures_iter(&folded) {
        let value: Option<f64> = caps[2].replace(',', ".").parse().ok();
        if let Some(v) = value {
            match &caps[1] {
                "min" => filters.area_min = Some(v),
                _ => filters.area_max = Some(v),
            }
        }
        let span = caps.get(0).unwrap();
        without_areas.replace_range(span.range(), &" ".repeat(span.len()));
    }
    for caps in price_re().captures_iter(&without_areas) {
        let mut amount = match crate::types::parse_money(&caps[2]) {
            Some(v) => v,
            None => continue,
        };
        if caps.get(3).is_some() {
            amount *= 1_000_000.0;
        }
        match &caps[1] {
            "min" => filters.price_min = Some(amount),
            _ => filters.price_max = Some(amount),
        }
    }

    // (e) transaction, category, commune, district mentions
    for kind in TRANSACTION_SCAN_ORDER {
        if kind.cue_terms().iter().any(|t| folded.contains(t)) {
            if filters.transaction != Some(kind) {
                filters.transaction = Some(kind);
            }
            break;
        }
    }

    for category in &facets.categories {
        if matches_text(&folded, category) {
            if filters.category.as_deref() != Some(category.as_str()) {
                filters.category = Some(category.clone());
            }
            break;
        }
    }

    for commune in hints.communes() {
        if folded.contains(&normalize(commune)) || matches_text(&folded, commune) {
            if filters.commune != *commune {
                filters.commune = commune.clone();
            }
            break;
        }
    }

    // Deterministic district scan: aliases in sorted order
    let mut district_aliases: Vec<_> = hints.iter().collect();
    district_aliases.sort_by(|a, b| a.0.cmp(b.0));
    for (alias, (commune, district)) in district_aliases {
        if folded.contains(alias.as_str()) {
            if filters.district != *district {
                filters.district = district.clone();
            }
            if filters.commune.is_empty() && !commune.is_empty() {
                filters.commune = commune.clone();
            }
            break;
        }
    }

    ExtractedIntent { filters, negated }
}
