// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Free-form address strings → (commune, district).
//!
//! Addresses come in as whatever the agency typed: "Canastel, Bir El Djir",
//! "Maraval - Oran", "Résidence El Yasmine / Akid Lotfi / Bir El Djir". The
//! parser splits on a fixed separator set and looks for a known commune among
//! the pieces.
//!
//! Known limitation, kept on purpose: when no piece matches a known commune,
//! the whole joined string lands in `district` with an empty commune. The
//! suggestion and aggregation layers depend on that shape, so it stays until
//! product says otherwise.

use crate::text::normalize;
use std::collections::HashMap;

/// Separators recognized inside address strings.
const SEPARATORS: [char; 8] = ['-', ',', '|', '/', '·', '•', '–', '—'];

/// A parsed address. Either side may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLocation {
    pub commune: String,
    pub district: String,
}

/// Split a free-form address into (commune, district) against a known-commune
/// list.
///
/// Single piece: a recognized commune gives `(commune, "")`, anything else
/// gives `("", district)`. Multiple pieces: the first piece matching a known
/// commune becomes the commune and the first non-commune piece becomes the
/// district; later pieces (building names and the like) are ignored. When no
/// piece matches a commune, the full joined string becomes the district.
///
/// Commune matching is case- and diacritic-insensitive, and the canonical
/// catalogue spelling is returned.
pub fn parse_location(raw: &str, communes: &[String]) -> ParsedLocation {
    let pieces: Vec<&str> = raw
        .split(SEPARATORS)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let canonical = |piece: &str| -> Option<String> {
        let folded = normalize(piece);
        communes.iter().find(|c| normalize(c) == folded).cloned()
    };

    match pieces.len() {
        0 => ParsedLocation::default(),
        1 => match canonical(pieces[0]) {
            Some(commune) => ParsedLocation { commune, district: String::new() },
            None => ParsedLocation { commune: String::new(), district: pieces[0].to_string() },
        },
        _ => {
            let commune = pieces.iter().find_map(|p| canonical(p));
            match commune {
                Some(commune) => {
                    let district = pieces
                        .iter()
                        .find(|p| canonical(p).is_none())
                        .map(|p| (*p).to_string())
                        .unwrap_or_default();
                    ParsedLocation { commune, district }
                }
                // Degraded fallback: no recognized commune anywhere.
                None => ParsedLocation {
                    commune: String::new(),
                    district: pieces.join(", "),
                },
            }
        }
    }
}

/// District → commune hints, learned once per candidate set.
///
/// Built from the static district catalogue plus every (commune, district)
/// pair the parser finds in the candidate listings. Read-only after
/// construction; rebuilt whenever the candidate set or catalogue changes.
#[derive(Debug, Clone, Default)]
pub struct LocationHints {
    /// Folded district alias → (canonical commune, canonical district).
    by_district: HashMap<String, (String, String)>,
    communes: Vec<String>,
}

impl LocationHints {
    pub fn build<'a>(
        communes: &[String],
        district_pairs: &[(String, String)],
        listing_locations: impl Iterator<Item = &'a str>,
    ) -> Self {
        let mut by_district = HashMap::new();
        for (district, commune) in district_pairs {
            by_district
                .entry(normalize(district))
                .or_insert_with(|| (commune.clone(), district.clone()));
        }
        for raw in listing_locations {
            let parsed = parse_location(raw, communes);
            if !parsed.commune.is_empty() && !parsed.district.is_empty() {
                by_district
                    .entry(normalize(&parsed.district))
                    .or_insert_with(|| (parsed.commune.clone(), parsed.district.clone()));
            }
        }
        LocationHints { by_district, communes: communes.to_vec() }
    }

    /// Resolve a folded district alias to its (commune, district) pair.
    pub fn district_hint(&self, folded_alias: &str) -> Option<&(String, String)> {
        self.by_district.get(folded_alias)
    }

    /// All known (district alias folded, commune, district) facts.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &(String, String))> {
        self.by_district.iter()
    }

    /// Canonical commune for a folded name, if known.
    pub fn commune(&self, folded: &str) -> Option<&String> {
        self.communes.iter().find(|c| normalize(c) == folded)
    }

    pub fn communes(&self) -> &[String] {
        &self.communes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn communes() -> Vec<String> {
        ["Oran", "Bir El Djir", "Es Senia", "Ain El Turck"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_single_token_commune() {
        let p = parse_location("Oran", &communes());
        assert_eq!(p.commune, "Oran");
        assert_eq!(p.district, "");
    }

    #[test]
    fn test_single_token_district() {
        let p = parse_location("Maraval", &communes());
        assert_eq!(p.commune, "");
        assert_eq!(p.district, "Maraval");
    }

    #[test]
    fn test_district_then_commune() {
        let p = parse_location("Canastel, Bir El Djir", &communes());
        assert_eq!(p.commune, "Bir El Djir");
        assert_eq!(p.district, "Canastel");
    }

    #[test]
    fn test_building_name_ignored() {
        let p = parse_location("Résidence Yasmine / Canastel / Bir El Djir", &communes());
        assert_eq!(p.commune, "Bir El Djir");
        // First non-commune piece wins, later ones are ignored
        assert_eq!(p.district, "Résidence Yasmine");
    }

    #[test]
    fn test_diacritic_insensitive_commune() {
        let p = parse_location("aïn el türck", &communes());
        assert_eq!(p.commune, "Ain El Turck");
    }

    #[test]
    fn test_degraded_fallback_keeps_full_string() {
        // No recognized commune: the whole joined string becomes the district.
        let p = parse_location("Hai Khemisti - Cite 200 Logts", &communes());
        assert_eq!(p.commune, "");
        assert_eq!(p.district, "Hai Khemisti, Cite 200 Logts");
    }

    #[test]
    fn test_hints_learned_from_candidates() {
        let locations = ["Canastel, Bir El Djir", "Maraval - Oran"];
        let hints =
            LocationHints::build(&communes(), &[], locations.iter().copied());
        let (commune, district) = hints.district_hint("canastel").unwrap();
        assert_eq!(commune, "Bir El Djir");
        assert_eq!(district, "Canastel");
        assert_eq!(hints.district_hint("maraval").unwrap().0, "Oran");
    }
}
