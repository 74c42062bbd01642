// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query-time autocomplete, grouped by facet.
//!
//! Candidates come from two places: the facet catalogue (transaction,
//! category, commune, district, room values) and "smart query" phrases mined
//! from the candidate set itself (transaction + category + rooms + district
//! + commune joined into one label). Every suggestion must match the typed
//! query and must have at least one live match in the candidate set;
//! anything with a zero count is discarded rather than dangled in front of
//! the user.

use crate::facets::FacetCatalogue;
use crate::fuzzy::matches_text;
use crate::score::{
    matches_category, matches_commune, matches_district, matches_rooms, matches_transaction,
    Candidate,
};
use crate::text::{normalize, tokenize};
use crate::types::{FacetKind, Filters, SearchSuggestion};
use std::collections::HashMap;

/// Hard cap on suggestions per keystroke.
const MAX_SUGGESTIONS: usize = 12;
/// Smart phrases need at least this many non-empty parts.
const SMART_MIN_PARTS: usize = 2;

/// Build ranked, deduplicated, facet-grouped suggestions for the current
/// query. Recomputed on every keystroke.
pub fn suggestions(
    query: &str,
    filters: &Filters,
    candidates: &[Candidate],
    facets: &FacetCatalogue,
) -> Vec<SearchSuggestion> {
    let folded_query = normalize(query);
    let mut ranked: Vec<(u8, SearchSuggestion)> = Vec::new();
    let mut push = |quality: Option<u8>, suggestion: SearchSuggestion| {
        if let Some(quality) = quality {
            if suggestion.match_count > 0
                && !ranked
                    .iter()
                    .any(|(_, s)| s.facet == suggestion.facet && s.value == suggestion.value)
            {
                ranked.push((quality, suggestion));
            }
        }
    };

    for (label, count) in smart_phrases(candidates) {
        push(
            match_quality(&normalize(&label), &folded_query),
            SearchSuggestion {
                key: format!("smart:{}", normalize(&label)),
                facet: FacetKind::SmartQuery,
                label: label.clone(),
                value: label,
                match_count: count,
                transaction: None,
                category: None,
                commune: None,
                district: None,
                rooms: None,
            },
        );
    }

    for kind in &facets.transactions {
        if filters.transaction == Some(*kind) {
            continue;
        }
        let count = candidates.iter().filter(|c| matches_transaction(c, Some(*kind))).count();
        push(
            match_quality(&normalize(kind.label()), &folded_query),
            SearchSuggestion {
                key: format!("transaction:{}", normalize(kind.label())),
                facet: FacetKind::Transaction,
                label: kind.label().to_string(),
                value: kind.label().to_string(),
                match_count: count,
                transaction: Some(*kind),
                category: None,
                commune: None,
                district: None,
                rooms: None,
            },
        );
    }

    for category in &facets.categories {
        if filters.category.as_deref() == Some(category.as_str()) {
            continue;
        }
        let count = candidates.iter().filter(|c| matches_category(c, Some(category.as_str()))).count();
        push(
            match_quality(&normalize(category), &folded_query),
            SearchSuggestion {
                key: format!("category:{}", normalize(category)),
                facet: FacetKind::Category,
                label: category.clone(),
                value: category.clone(),
                match_count: count,
                transaction: None,
                category: Some(category.clone()),
                commune: None,
                district: None,
                rooms: None,
            },
        );
    }

    for commune in &facets.communes {
        if filters.commune == *commune {
            continue;
        }
        let count = candidates.iter().filter(|c| matches_commune(c, commune)).count();
        push(
            match_quality(&normalize(commune), &folded_query),
            SearchSuggestion {
                key: format!("commune:{}", normalize(commune)),
                facet: FacetKind::Commune,
                label: commune.clone(),
                value: commune.clone(),
                match_count: count,
                transaction: None,
                category: None,
                commune: Some(commune.clone()),
                district: None,
                rooms: None,
            },
        );
    }

    for (district, commune) in &facets.districts {
        if filters.district == *district {
            continue;
        }
        let count = candidates.iter().filter(|c| matches_district(c, district)).count();
        let label = if commune.is_empty() {
            district.clone()
        } else {
            format!("{district}, {commune}")
        };
        push(
            match_quality(&normalize(district), &folded_query),
            SearchSuggestion {
                key: format!("district:{}", normalize(district)),
                facet: FacetKind::District,
                label,
                value: district.clone(),
                match_count: count,
                transaction: None,
                category: None,
                commune: (!commune.is_empty()).then(|| commune.clone()),
                district: Some(district.clone()),
                rooms: None,
            },
        );
    }

    for room in &facets.rooms {
        if filters.rooms == *room {
            continue;
        }
        let count = candidates.iter().filter(|c| matches_rooms(c, room)).count();
        push(
            match_quality(&normalize(room), &folded_query),
            SearchSuggestion {
                key: format!("room:{}", normalize(room)),
                facet: FacetKind::Room,
                label: room.clone(),
                value: room.clone(),
                match_count: count,
                transaction: None,
                category: None,
                commune: None,
                district: None,
                rooms: Some(room.clone()),
            },
        );
    }

    // Facet priority, then match quality, then count descending, then label
    ranked.sort_by(|(qa, a), (qb, b)| {
        a.facet
            .cmp(&b.facet)
            .then(qa.cmp(qb))
            .then(b.match_count.cmp(&a.match_count))
            .then(a.label.cmp(&b.label))
    });
    ranked.truncate(MAX_SUGGESTIONS);
    ranked.into_iter().map(|(_, s)| s).collect()
}

/// How well a candidate label matches the typed query. Exact beats prefix
/// beats substring beats tokenized fuzzy; `None` means no match at all.
fn match_quality(folded_label: &str, folded_query: &str) -> Option<u8> {
    if folded_query.is_empty() {
        return Some(2);
    }
    if folded_label == folded_query {
        return Some(0);
    }
    if folded_label.starts_with(folded_query) {
        return Some(1);
    }
    if folded_label.contains(folded_query) {
        return Some(2);
    }
    let tokens = tokenize(folded_query);
    if !tokens.is_empty() && tokens.iter().any(|t| matches_text(folded_label, t)) {
        return Some(3);
    }
    None
}

/// Mine multi-facet phrases from the candidate set: transaction label +
/// category + room label + district + commune, deduplicated and ranked by
/// occurrence. Phrases with fewer than two non-empty parts are dropped.
fn smart_phrases(candidates: &[Candidate]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, (String, usize)> = HashMap::new();
    for candidate in candidates {
        let listing = &candidate.listing;
        let mut parts: Vec<String> = vec![listing.transaction_kind.label().to_string()];
        if let Some(category) = &listing.category {
            parts.push(category.clone());
        }
        parts.push(listing.room_label());
        if !candidate.parsed_location.district.is_empty() {
            parts.push(candidate.parsed_location.district.clone());
        }
        if !candidate.parsed_location.commune.is_empty() {
            parts.push(candidate.parsed_location.commune.clone());
        }
        let parts: Vec<String> = parts.into_iter().filter(|p| !p.is_empty()).collect();
        if parts.len() < SMART_MIN_PARTS {
            continue;
        }
        let label = parts.join(" ");
        let entry = counts.entry(normalize(&label)).or_insert_with(|| (label, 0));
        entry.1 += 1;
    }
    let mut phrases: Vec<(String, usize)> = counts.into_values().collect();
    // Occurrence count descending, then label for determinism
    phrases.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    phrases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationHints;
    use crate::types::{AmenityKey, Listing, TransactionKind};
    use std::collections::BTreeSet;

    fn fixture(
        ref_code: &str,
        kind: TransactionKind,
        category: &str,
        location: &str,
        beds: u32,
    ) -> Listing {
        Listing {
            id: 0,
            ref_code: ref_code.into(),
            title: format!("{category} {location}"),
            transaction_kind: kind,
            location_type: None,
            category: Some(category.into()),
            description: None,
            price: "5 000 000".into(),
            location: location.into(),
            beds,
            baths: 1,
            area: 100.0,
            created_at: None,
            images: vec![],
            amenities: Some(BTreeSet::from([AmenityKey::Balcon])),
        }
    }

    fn setup() -> (Vec<Candidate>, FacetCatalogue) {
        let communes: Vec<String> = vec!["Oran".into(), "Bir El Djir".into()];
        let listings = vec![
            fixture("ORN-1", TransactionKind::Sale, "Appartement", "Canastel, Bir El Djir", 2),
            fixture("ORN-2", TransactionKind::Sale, "Appartement", "Canastel, Bir El Djir", 2),
            fixture("ORN-3", TransactionKind::RentMonthly, "Villa", "Maraval - Oran", 4),
        ];
        let hints =
            LocationHints::build(&communes, &[], listings.iter().map(|l| l.location.as_str()));
        let facets = FacetCatalogue::build(&listings, &hints);
        let candidates: Vec<Candidate> =
            listings.into_iter().map(|l| Candidate::new(l, &communes)).collect();
        (candidates, facets)
    }

    #[test]
    fn test_capped_and_grouped_by_facet_priority() {
        let (candidates, facets) = setup();
        let out = suggestions("", &Filters::default(), &candidates, &facets);
        assert!(out.len() <= 12);
        // Facet groups arrive in priority order
        let facets_seen: Vec<FacetKind> = out.iter().map(|s| s.facet).collect();
        let mut sorted = facets_seen.clone();
        sorted.sort();
        assert_eq!(facets_seen, sorted);
        assert_eq!(out[0].facet, FacetKind::SmartQuery);
    }

    #[test]
    fn test_smart_phrase_ranked_by_occurrence() {
        let (candidates, facets) = setup();
        let out = suggestions("", &Filters::default(), &candidates, &facets);
        let smart: Vec<&SearchSuggestion> =
            out.iter().filter(|s| s.facet == FacetKind::SmartQuery).collect();
        assert!(smart[0].label.contains("Appartement"));
        assert_eq!(smart[0].match_count, 2);
    }

    #[test]
    fn test_zero_match_suggestions_discarded() {
        let (candidates, facets) = setup();
        let out = suggestions("studio", &Filters::default(), &candidates, &facets);
        // No studio listing exists (min beds is 2), so no Room suggestion for it
        assert!(out
            .iter()
            .all(|s| !(s.facet == FacetKind::Room && s.value == "Studio")));
    }

    #[test]
    fn test_query_filters_candidates() {
        let (candidates, facets) = setup();
        let out = suggestions("bir", &Filters::default(), &candidates, &facets);
        assert!(out.iter().any(|s| s.facet == FacetKind::Commune && s.value == "Bir El Djir"));
        assert!(!out.iter().any(|s| s.facet == FacetKind::Commune && s.value == "Oran"));
    }

    #[test]
    fn test_typo_still_suggests() {
        let (candidates, facets) = setup();
        let out = suggestions("canastl", &Filters::default(), &candidates, &facets);
        assert!(out.iter().any(|s| s.facet == FacetKind::District && s.value == "Canastel"));
    }

    #[test]
    fn test_applying_district_suggestion_sets_commune_too() {
        let (candidates, facets) = setup();
        let out = suggestions("canastel", &Filters::default(), &candidates, &facets);
        let district = out.iter().find(|s| s.facet == FacetKind::District).unwrap();
        let next = district.apply(&Filters::default());
        assert_eq!(next.district, "Canastel");
        assert_eq!(next.commune, "Bir El Djir");
    }

    #[test]
    fn test_already_selected_values_not_suggested() {
        let (candidates, facets) = setup();
        let filters = Filters { commune: "Oran".into(), ..Filters::default() };
        let out = suggestions("", &filters, &candidates, &facets);
        assert!(!out.iter().any(|s| s.facet == FacetKind::Commune && s.value == "Oran"));
    }
}
