// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Top-level search façade.
//!
//! [`SearchEngine`] owns the prepared candidate set, the location hints and
//! the facet catalogue, and stitches the per-keystroke pipeline together:
//! intent extraction, suggestions, filter evaluation, ranking, zero-result
//! recovery and preset ordering. It holds no session state itself; behavior
//! counters and preset stats live in a [`SessionStore`] the caller passes in
//! where needed.

use crate::behavior::{keys, SessionStore};
use crate::facets::FacetCatalogue;
use crate::intent::{extract_intent, ExtractedIntent};
use crate::location::LocationHints;
use crate::presets::{
    self, AiPreset, AiPresetStats, PresetView,
};
use crate::recover::{recover, RecoveryAction};
use crate::score::{evaluate, rank, Candidate, Ranked, ScoreInputs};
use crate::suggest::suggestions;
use crate::types::{AmenityKey, Filters, Listing, SearchSuggestion};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// One search pass over the candidate set.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Included candidates in display order; `index` points into the
    /// engine's candidate slice.
    pub ranked: Vec<Ranked>,
    /// The context set: candidates passing every filter except amenity
    /// inclusion. Preset counts are computed against this, so an applied
    /// preset does not zero out its siblings.
    pub context_indices: Vec<usize>,
    pub zero: bool,
}

pub struct SearchEngine {
    candidates: Vec<Candidate>,
    hints: LocationHints,
    facets: FacetCatalogue,
}

impl SearchEngine {
    pub fn new(
        listings: Vec<Listing>,
        communes: Vec<String>,
        district_pairs: Vec<(String, String)>,
    ) -> Self {
        let hints = LocationHints::build(
            &communes,
            &district_pairs,
            listings.iter().map(|l| l.location.as_str()),
        );
        let facets = FacetCatalogue::build(&listings, &hints);
        let candidates: Vec<Candidate> =
            listings.into_iter().map(|l| Candidate::new(l, hints.communes())).collect();
        debug!(
            candidates = candidates.len(),
            communes = facets.communes.len(),
            districts = facets.districts.len(),
            "engine ready"
        );
        SearchEngine { candidates, hints, facets }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn facets(&self) -> &FacetCatalogue {
        &self.facets
    }

    pub fn hints(&self) -> &LocationHints {
        &self.hints
    }

    /// Parse structured cues out of a free-text query, on top of the
    /// current filter state.
    pub fn parse_query(&self, query: &str, current: &Filters) -> ExtractedIntent {
        extract_intent(query, current, &self.facets, &self.hints)
    }

    /// Autocomplete for the current keystroke.
    pub fn suggestions(&self, query: &str, filters: &Filters) -> Vec<SearchSuggestion> {
        suggestions(query, filters, &self.candidates, &self.facets)
    }

    /// Evaluate and rank every candidate against `filters`.
    pub fn search(&self, filters: &Filters, inputs: &ScoreInputs<'_>) -> SearchOutcome {
        let mut ranked = Vec::new();
        let mut context_indices = Vec::new();
        for (index, candidate) in self.candidates.iter().enumerate() {
            let full = evaluate(candidate, filters, inputs, false);
            if full.included {
                ranked.push(Ranked { index, score: full.score });
            }
            if full.included || evaluate(candidate, filters, inputs, true).included {
                context_indices.push(index);
            }
        }
        let zero = ranked.is_empty();
        if zero {
            debug!(query = %filters.query, "zero results");
        }
        let ranked = rank(ranked, &self.candidates, filters.sort);
        SearchOutcome { ranked, context_indices, zero }
    }

    /// Ordered relaxation suggestions for a zero-result state, each with the
    /// result count it would produce.
    pub fn recovery(
        &self,
        filters: &Filters,
        inputs: &ScoreInputs<'_>,
    ) -> Vec<(RecoveryAction, usize)> {
        recover(filters)
            .into_iter()
            .map(|action| {
                let relaxed = action.apply(filters);
                let count = self.search(&relaxed, inputs).ranked.len();
                (action, count)
            })
            .collect()
    }

    /// The full preset catalogue, ordered for display against the current
    /// context set. Stats and custom presets come from the session store.
    pub fn preset_views(
        &self,
        filters: &Filters,
        outcome: &SearchOutcome,
        store: &SessionStore,
        now_ms: i64,
    ) -> Vec<PresetView> {
        let stats: HashMap<String, AiPresetStats> = store.load(keys::PRESET_STATS);
        let custom: Vec<AiPreset> = store.load(keys::CUSTOM_PRESETS);
        let context = self.context(outcome);
        let catalogue = presets::catalogue(&self.candidates, &custom);
        presets::order_presets(catalogue, filters, &context, &stats, now_ms)
    }

    /// "You might also like" companions for an applied preset: other
    /// catalogue entries ranked by how much of the preset's matching
    /// listings they also cover.
    pub fn related_presets(
        &self,
        active: &AiPreset,
        views: &[PresetView],
        outcome: &SearchOutcome,
    ) -> Vec<(AiPreset, f64)> {
        let context = self.context(outcome);
        let others: Vec<AiPreset> = views.iter().map(|v| v.preset.clone()).collect();
        presets::related_presets(active, &others, &context)
            .into_iter()
            .map(|(preset, overlap)| (preset.clone(), overlap))
            .collect()
    }

    /// Apply or clear a preset and record the click.
    pub fn toggle_preset(
        &self,
        preset: &AiPreset,
        filters: &Filters,
        outcome: &SearchOutcome,
        store: &mut SessionStore,
        now_ms: i64,
    ) -> Filters {
        let context = self.context(outcome);
        let count = presets::preset_count(preset, &context);
        let mut stats: HashMap<String, AiPresetStats> = store.load(keys::PRESET_STATS);
        let entry = stats.entry(preset.key.clone()).or_default();
        entry.clicks += 1;
        entry.last_used_at = Some(now_ms);
        store.save(keys::PRESET_STATS, &stats);
        presets::toggle(preset, filters, count)
    }

    /// Persist the current amenity selection as a custom preset. Returns
    /// `None` when the selection is too small to be worth saving.
    pub fn save_custom_preset(
        &self,
        store: &mut SessionStore,
        label: &str,
        included: &BTreeSet<AmenityKey>,
    ) -> Option<AiPreset> {
        let mut custom: Vec<AiPreset> = store.load(keys::CUSTOM_PRESETS);
        let saved = presets::save_custom(&mut custom, label, included)?;
        store.save(keys::CUSTOM_PRESETS, &custom);
        let mut stats: HashMap<String, AiPresetStats> = store.load(keys::PRESET_STATS);
        stats.entry(saved.key.clone()).or_default().saves += 1;
        store.save(keys::PRESET_STATS, &stats);
        Some(saved)
    }

    fn context<'a>(&'a self, outcome: &SearchOutcome) -> Vec<&'a Candidate> {
        outcome.context_indices.iter().map(|&i| &self.candidates[i]).collect()
    }
}
