// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Amenity-combination presets ("AI filters").
//!
//! Three sources feed one ordered, deduplicated catalogue: a fixed curated
//! list, pairs auto-generated from amenity co-occurrence in the candidate
//! set, and user-saved custom presets. Ordering is self-tuning: usage
//! counters (clicks, contacts, saves) persist across sessions and feed the
//! ordering score, so presets people actually use float up.
//!
//! Counts are estimated against the "context" result set (every predicate
//! except amenity inclusion) to avoid the chicken-and-egg effect of a
//! preset's own filter hiding its matches.

use crate::score::Candidate;
use crate::text::normalize;
use crate::types::{AmenityKey, Filters, PublishedWithin};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Generated pairs must co-occur in at least this many listings.
const GENERATED_MIN_OCCURRENCES: usize = 2;
/// How many generated pairs survive, by descending count.
const GENERATED_MAX: usize = 4;
/// Custom presets: minimum amenities and list cap (oldest evicted).
const CUSTOM_MIN_AMENITIES: usize = 2;
const CUSTOM_MAX: usize = 12;
/// Trend windows, in days.
const TREND_WINDOW_DAYS: i64 = 7;

/// Ordering score weights.
const ORDER_ACTIVE_WEIGHT: f64 = 1000.0;
const ORDER_COUNT_WEIGHT: f64 = 4.0;
const ORDER_CLICK_WEIGHT: f64 = 1.2;
const ORDER_CONTACT_WEIGHT: f64 = 3.5;
const ORDER_SAVE_WEIGHT: f64 = 2.0;

/// How many related presets to surface per active preset.
const RELATED_MAX: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetSource {
    Curated,
    Generated,
    Custom,
}

impl PresetSource {
    /// Small ordering bonus: custom > generated > curated.
    fn bonus(self) -> f64 {
        match self {
            PresetSource::Custom => 1.5,
            PresetSource::Generated => 1.0,
            PresetSource::Curated => 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiPreset {
    pub key: String,
    pub label: String,
    pub amenities: BTreeSet<AmenityKey>,
    pub source: PresetSource,
}

/// Per-preset usage counters. Incremented, never decremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiPresetStats {
    pub clicks: u64,
    pub contacts: u64,
    pub saves: u64,
    pub last_used_at: Option<i64>,
}

/// A preset with its per-render derived numbers.
#[derive(Debug, Clone)]
pub struct PresetView {
    pub preset: AiPreset,
    /// Listings in the context set whose amenities are a superset.
    pub count: usize,
    /// Last 7 days minus the 7-14 day window, over matching listings.
    pub trend: i64,
    pub active: bool,
    pub order_score: f64,
}

/// The fixed curated catalogue.
pub fn curated_presets() -> Vec<AiPreset> {
    let preset = |key: &str, label: &str, amenities: &[AmenityKey]| AiPreset {
        key: format!("curated:{key}"),
        label: label.to_string(),
        amenities: amenities.iter().copied().collect(),
        source: PresetSource::Curated,
    };
    vec![
        preset(
            "famille",
            "Confort famille",
            &[AmenityKey::DoubleAscenseur, AmenityKey::Parking, AmenityKey::CuisineEquipee],
        ),
        preset("plein-air", "Vue et plein air", &[AmenityKey::VueMer, AmenityKey::Balcon]),
        preset(
            "securise",
            "Sécurisé",
            &[AmenityKey::PorteBlindee, AmenityKey::Interphone, AmenityKey::CameraSurveillance],
        ),
        preset("pret-a-vivre", "Prêt à vivre", &[AmenityKey::Meuble, AmenityKey::CuisineEquipee]),
        preset(
            "eco-energie",
            "Éco énergie",
            &[AmenityKey::PanneauxSolaires, AmenityKey::DoubleVitrage],
        ),
        preset(
            "standing",
            "Standing",
            &[AmenityKey::Piscine, AmenityKey::Jardin, AmenityKey::Garage],
        ),
    ]
}

/// Mine frequent amenity pairs from the candidate set: every 2-subset of
/// each listing's amenities, kept when it occurs in at least 2 listings,
/// top 4 by count.
pub fn generated_presets(candidates: &[Candidate]) -> Vec<AiPreset> {
    let mut counts: HashMap<(AmenityKey, AmenityKey), usize> = HashMap::new();
    for candidate in candidates {
        let amenities: Vec<AmenityKey> =
            candidate.listing.amenity_set().iter().copied().collect();
        for i in 0..amenities.len() {
            for j in (i + 1)..amenities.len() {
                *counts.entry((amenities[i], amenities[j])).or_default() += 1;
            }
        }
    }
    let mut pairs: Vec<((AmenityKey, AmenityKey), usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= GENERATED_MIN_OCCURRENCES)
        .collect();
    // Descending count, then key order for determinism
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    pairs
        .into_iter()
        .take(GENERATED_MAX)
        .map(|((a, b), _)| AiPreset {
            key: format!("gen:{}+{}", normalize(a.label()), normalize(b.label())),
            label: format!("{} + {}", a.label(), b.label()),
            amenities: BTreeSet::from([a, b]),
            source: PresetSource::Generated,
        })
        .collect()
}

/// Ordered, deduplicated union of curated + generated + custom presets.
/// Deduplication is by amenity set; the earliest source wins (custom first so
/// a user's copy of a curated combination keeps their label).
pub fn catalogue(candidates: &[Candidate], custom: &[AiPreset]) -> Vec<AiPreset> {
    let mut seen: Vec<BTreeSet<AmenityKey>> = Vec::new();
    let mut out = Vec::new();
    for preset in custom
        .iter()
        .cloned()
        .chain(generated_presets(candidates))
        .chain(curated_presets())
    {
        if !seen.contains(&preset.amenities) {
            seen.push(preset.amenities.clone());
            out.push(preset);
        }
    }
    out
}

/// Count of context-set listings whose amenities are a superset of the
/// preset's.
pub fn preset_count(preset: &AiPreset, context: &[&Candidate]) -> usize {
    context
        .iter()
        .filter(|c| preset.amenities.is_subset(c.listing.amenity_set()))
        .count()
}

/// Recent-interest trend: matches created in the last 7 days minus matches
/// created in the 7-14 day window.
pub fn preset_trend(preset: &AiPreset, context: &[&Candidate], now_ms: i64) -> i64 {
    let window = TREND_WINDOW_DAYS * crate::score::MS_PER_DAY;
    let mut recent = 0_i64;
    let mut previous = 0_i64;
    for candidate in context {
        if !preset.amenities.is_subset(candidate.listing.amenity_set()) {
            continue;
        }
        let Some(created) = candidate.listing.created_at else { continue };
        let age = now_ms.saturating_sub(created);
        if age <= window {
            recent += 1;
        } else if age <= 2 * window {
            previous += 1;
        }
    }
    recent - previous
}

/// Is every amenity of the preset currently included?
pub fn is_active(preset: &AiPreset, filters: &Filters) -> bool {
    !preset.amenities.is_empty() && preset.amenities.is_subset(&filters.included_amenities)
}

fn ordering_score(preset: &AiPreset, active: bool, count: usize, stats: &AiPresetStats) -> f64 {
    f64::from(u8::from(active)) * ORDER_ACTIVE_WEIGHT
        + count as f64 * ORDER_COUNT_WEIGHT
        + stats.clicks as f64 * ORDER_CLICK_WEIGHT
        + stats.contacts as f64 * ORDER_CONTACT_WEIGHT
        + stats.saves as f64 * ORDER_SAVE_WEIGHT
        + preset.source.bonus()
}

/// Build the ordered preset views for one render. Stable sort keeps
/// insertion order on ties.
pub fn order_presets(
    presets: Vec<AiPreset>,
    filters: &Filters,
    context: &[&Candidate],
    stats: &HashMap<String, AiPresetStats>,
    now_ms: i64,
) -> Vec<PresetView> {
    let mut views: Vec<PresetView> = presets
        .into_iter()
        .map(|preset| {
            let count = preset_count(&preset, context);
            let trend = preset_trend(&preset, context, now_ms);
            let active = is_active(&preset, filters);
            let zero = AiPresetStats::default();
            let stat = stats.get(&preset.key).unwrap_or(&zero);
            let order_score = ordering_score(&preset, active, count, stat);
            PresetView { preset, count, trend, active, order_score }
        })
        .collect();
    views.sort_by(|a, b| {
        b.order_score.partial_cmp(&a.order_score).unwrap_or(std::cmp::Ordering::Equal)
    });
    views
}

/// Toggle a preset on or off.
///
/// Off: its amenities leave `included_amenities`. On with at least one
/// current match: its amenities join. On with zero matches: conflict relax —
/// the amenities join and every other narrowing filter is cleared so the
/// preset can surface any qualifying listings.
pub fn toggle(preset: &AiPreset, filters: &Filters, current_count: usize) -> Filters {
    let mut next = filters.clone();
    if is_active(preset, filters) {
        for amenity in &preset.amenities {
            next.included_amenities.remove(amenity);
        }
        return next;
    }
    next.included_amenities.extend(preset.amenities.iter().copied());
    if current_count == 0 {
        next.query = String::new();
        next.category = None;
        next.published_within = PublishedWithin::All;
        next.photos_only = false;
        next.commune = String::new();
        next.district = String::new();
        next.rooms = String::new();
        next.price_min = None;
        next.price_max = None;
        next.area_min = None;
        next.area_max = None;
        next.beds_min = None;
        next.baths_min = None;
        next.excluded_amenities.clear();
    }
    next
}

/// "You might also like": for each other preset, the fraction of the active
/// preset's matching listings that also match it. Top scorers above zero.
pub fn related_presets<'a>(
    active: &AiPreset,
    others: &'a [AiPreset],
    context: &[&Candidate],
) -> Vec<(&'a AiPreset, f64)> {
    let base: Vec<&&Candidate> = context
        .iter()
        .filter(|c| active.amenities.is_subset(c.listing.amenity_set()))
        .collect();
    if base.is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<(&AiPreset, f64)> = others
        .iter()
        .filter(|other| other.key != active.key)
        .map(|other| {
            let overlap = base
                .iter()
                .filter(|c| other.amenities.is_subset(c.listing.amenity_set()))
                .count();
            (other, overlap as f64 / base.len() as f64)
        })
        .filter(|(_, score)| *score > 0.0)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(RELATED_MAX);
    scored
}

/// Save the currently-included amenities as a custom preset. Requires at
/// least two; the new preset is prepended and the list capped at 12.
pub fn save_custom(
    custom: &mut Vec<AiPreset>,
    label: &str,
    included: &BTreeSet<AmenityKey>,
) -> Option<AiPreset> {
    if included.len() < CUSTOM_MIN_AMENITIES {
        return None;
    }
    let preset = AiPreset {
        key: format!("custom:{}", normalize(label)),
        label: label.to_string(),
        amenities: included.clone(),
        source: PresetSource::Custom,
    };
    custom.retain(|p| p.key != preset.key);
    custom.insert(0, preset.clone());
    custom.truncate(CUSTOM_MAX);
    Some(preset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Listing, TransactionKind};

    fn candidate(ref_code: &str, amenities: &[AmenityKey], created_at: Option<i64>) -> Candidate {
        Candidate::new(
            Listing {
                id: 0,
                ref_code: ref_code.into(),
                title: "Appartement".into(),
                transaction_kind: TransactionKind::Sale,
                location_type: None,
                category: None,
                description: None,
                price: "1 000 000".into(),
                location: "Oran".into(),
                beds: 2,
                baths: 1,
                area: 90.0,
                created_at,
                images: vec![],
                amenities: Some(amenities.iter().copied().collect()),
            },
            &["Oran".to_string()],
        )
    }

    #[test]
    fn test_generated_pairs_need_two_occurrences() {
        let candidates = vec![
            candidate("A", &[AmenityKey::Piscine, AmenityKey::Jardin], None),
            candidate("B", &[AmenityKey::Piscine, AmenityKey::Jardin], None),
            candidate("C", &[AmenityKey::Piscine, AmenityKey::Cave], None),
        ];
        let generated = generated_presets(&candidates);
        assert_eq!(generated.len(), 1);
        assert_eq!(
            generated[0].amenities,
            BTreeSet::from([AmenityKey::Jardin, AmenityKey::Piscine])
        );
        assert_eq!(generated[0].label, "Jardin + Piscine");
    }

    #[test]
    fn test_count_is_superset_match() {
        let candidates = vec![
            candidate("A", &[AmenityKey::Piscine, AmenityKey::Jardin, AmenityKey::Garage], None),
            candidate("B", &[AmenityKey::Piscine], None),
        ];
        let refs: Vec<&Candidate> = candidates.iter().collect();
        let preset = AiPreset {
            key: "t".into(),
            label: "t".into(),
            amenities: BTreeSet::from([AmenityKey::Piscine, AmenityKey::Jardin]),
            source: PresetSource::Curated,
        };
        assert_eq!(preset_count(&preset, &refs), 1);
    }

    #[test]
    fn test_trend_windows() {
        let now = 1_700_000_000_000;
        let day = crate::score::MS_PER_DAY;
        let candidates = vec![
            candidate("A", &[AmenityKey::Piscine], Some(now - 2 * day)),
            candidate("B", &[AmenityKey::Piscine], Some(now - 3 * day)),
            candidate("C", &[AmenityKey::Piscine], Some(now - 10 * day)),
            candidate("D", &[AmenityKey::Piscine], Some(now - 30 * day)),
        ];
        let refs: Vec<&Candidate> = candidates.iter().collect();
        let preset = AiPreset {
            key: "t".into(),
            label: "t".into(),
            amenities: BTreeSet::from([AmenityKey::Piscine]),
            source: PresetSource::Curated,
        };
        assert_eq!(preset_trend(&preset, &refs, now), 2 - 1);
    }

    #[test]
    fn test_ordering_prefers_active_then_usage() {
        let candidates = vec![candidate("A", &[AmenityKey::Piscine, AmenityKey::Jardin], None)];
        let refs: Vec<&Candidate> = candidates.iter().collect();
        let presets = catalogue(&candidates, &[]);
        let mut stats = HashMap::new();
        stats.insert(
            "curated:standing".to_string(),
            AiPresetStats { clicks: 50, contacts: 10, saves: 5, last_used_at: None },
        );

        let mut filters = Filters::default();
        filters.included_amenities =
            BTreeSet::from([AmenityKey::VueMer, AmenityKey::Balcon]);
        let views = order_presets(presets, &filters, &refs, &stats, 0);
        // Active preset first despite the usage stats on "standing"
        assert_eq!(views[0].preset.key, "curated:plein-air");
        assert!(views[0].active);
        assert_eq!(views[1].preset.key, "curated:standing");
    }

    #[test]
    fn test_toggle_off_removes_amenities() {
        let preset = curated_presets().remove(1); // Vue et plein air
        let mut filters = Filters::default();
        filters.included_amenities = preset.amenities.clone();
        filters.included_amenities.insert(AmenityKey::Garage);
        let next = toggle(&preset, &filters, 3);
        assert!(!next.included_amenities.contains(&AmenityKey::VueMer));
        assert!(next.included_amenities.contains(&AmenityKey::Garage));
    }

    #[test]
    fn test_conflict_relax_clears_narrowing_filters() {
        let preset = curated_presets().remove(5); // Standing
        let mut filters = Filters::default();
        filters.query = "studio".into();
        filters.commune = "Oran".into();
        filters.rooms = "F2".into();
        filters.price_max = Some(1_000_000.0);
        filters.excluded_amenities.insert(AmenityKey::Cave);
        let next = toggle(&preset, &filters, 0);
        assert!(next.included_amenities.is_superset(&preset.amenities));
        assert!(next.query.is_empty());
        assert!(next.commune.is_empty());
        assert!(next.rooms.is_empty());
        assert_eq!(next.price_max, None);
        assert!(next.excluded_amenities.is_empty());
    }

    #[test]
    fn test_related_overlap_fraction() {
        let candidates = vec![
            candidate("A", &[AmenityKey::VueMer, AmenityKey::Balcon, AmenityKey::Piscine], None),
            candidate("B", &[AmenityKey::VueMer, AmenityKey::Balcon], None),
        ];
        let refs: Vec<&Candidate> = candidates.iter().collect();
        let active = AiPreset {
            key: "a".into(),
            label: "a".into(),
            amenities: BTreeSet::from([AmenityKey::VueMer, AmenityKey::Balcon]),
            source: PresetSource::Curated,
        };
        let others = vec![
            AiPreset {
                key: "b".into(),
                label: "b".into(),
                amenities: BTreeSet::from([AmenityKey::Piscine]),
                source: PresetSource::Curated,
            },
            AiPreset {
                key: "c".into(),
                label: "c".into(),
                amenities: BTreeSet::from([AmenityKey::Cave]),
                source: PresetSource::Curated,
            },
        ];
        let related = related_presets(&active, &others, &refs);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].0.key, "b");
        assert!((related[0].1 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_save_custom_requires_two_and_caps() {
        let mut custom = Vec::new();
        assert!(save_custom(&mut custom, "solo", &BTreeSet::from([AmenityKey::Cave])).is_none());
        for i in 0..14 {
            let set = BTreeSet::from([AmenityKey::ALL[i], AmenityKey::ALL[i + 1]]);
            assert!(save_custom(&mut custom, &format!("combo {i}"), &set).is_some());
        }
        assert_eq!(custom.len(), 12);
        // Most recent first
        assert_eq!(custom[0].label, "combo 13");
    }
}
