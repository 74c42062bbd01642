// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The filter evaluator and relevance scorer.
//!
//! Every candidate listing goes through [`evaluate`] once per filter change:
//! structured predicates decide inclusion, and a composite score blends the
//! weak ranking signals (text match strength, structural matches, freshness,
//! photo count, engagement, optional semantic similarity, personalized
//! recommendation boost). The evaluation is deterministic given the
//! `(listing, filters, snapshots)` inputs.
//!
//! # Constants
//!
//! The weights below are tuned values carried for behavioral parity. They
//! have no documented derivation; changing any of them is a product
//! decision, not a bug fix.

use crate::behavior::SearchBehavior;
use crate::fuzzy::{matches_text, matches_text_literal};
use crate::location::{parse_location, ParsedLocation};
use crate::remote::{RecommendationBoosts, SemanticScores};
use crate::text::{normalize, tokenize};
use crate::types::{
    parse_money, parse_rooms, Filters, Listing, RoomSpec, SortMode, TransactionKind,
};
use std::cmp::Ordering;
use std::collections::BTreeSet;

// =============================================================================
// SCORING CONSTANTS
// =============================================================================

/// Weight of the literal token-match ratio.
pub const TEXT_TOKEN_WEIGHT: f64 = 42.0;
/// Weight of the alias-expanded token-match ratio.
pub const ALIAS_TOKEN_WEIGHT: f64 = 18.0;
/// Weight of the external semantic similarity score alongside a text query.
pub const SEMANTIC_WEIGHT: f64 = 44.0;
/// Weight of the external semantic score when the query is empty.
pub const SEMANTIC_ONLY_WEIGHT: f64 = 14.0;

/// Minimum fraction of literal token matches for the text predicate.
pub const TOKEN_MATCH_RATIO: f64 = 0.6;
/// Minimum fraction of alias-expanded token matches for the text predicate.
pub const ALIAS_MATCH_RATIO: f64 = 0.45;
/// Semantic similarity at or above this passes the text predicate outright.
pub const SEMANTIC_MATCH_THRESHOLD: f64 = 0.61;

/// Structured-match bonuses, additive per active passing filter.
pub const BONUS_TRANSACTION: f64 = 5.0;
pub const BONUS_CATEGORY: f64 = 4.0;
pub const BONUS_COMMUNE: f64 = 3.0;
pub const BONUS_DISTRICT: f64 = 2.0;
pub const BONUS_ROOMS: f64 = 2.0;

/// Freshness: `max(0, CEILING - age_days * DECAY)`.
pub const FRESHNESS_CEILING: f64 = 12.0;
pub const FRESHNESS_DECAY_PER_DAY: f64 = 0.16;

/// Photo term: `min(image_count, PHOTO_CAP) * PHOTO_WEIGHT`.
pub const PHOTO_CAP: usize = 6;
pub const PHOTO_WEIGHT: f64 = 1.05;

/// Engagement term weights.
pub const ENGAGEMENT_VIEW: f64 = 0.7;
pub const ENGAGEMENT_FAVORITE: f64 = 1.9;
pub const ENGAGEMENT_CONTACT: f64 = 3.1;

/// Recommendation boost: normalized score and inverse-rank components, with
/// a discount while the user is typing a query.
pub const RECO_SCORE_WEIGHT: f64 = 30.0;
pub const RECO_RANK_WEIGHT: f64 = 12.0;
pub const RECO_TYPING_DISCOUNT: f64 = 0.42;

pub const MS_PER_DAY: i64 = 86_400_000;

// =============================================================================
// CANDIDATES
// =============================================================================

/// A listing with its derived matching state, computed once per session.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub listing: Listing,
    pub parsed_location: ParsedLocation,
    /// Folded searchable text: title, description, location, category,
    /// transaction text, room label and amenity labels.
    pub haystack: String,
    pub price_value: Option<f64>,
    /// Transaction kind with the raw `locationType` text applied as the
    /// source of truth when it carries a recognizable cue.
    pub effective_transaction: TransactionKind,
    behavior_key: String,
}

impl Candidate {
    pub fn new(listing: Listing, communes: &[String]) -> Self {
        let parsed_location = parse_location(&listing.location, communes);
        let mut parts: Vec<String> = vec![listing.title.clone()];
        if let Some(d) = &listing.description {
            parts.push(d.clone());
        }
        parts.push(listing.location.clone());
        if let Some(c) = &listing.category {
            parts.push(c.clone());
        }
        if let Some(t) = &listing.location_type {
            parts.push(t.clone());
        }
        parts.push(listing.room_label());
        for amenity in listing.amenity_set() {
            parts.push(amenity.label().to_string());
        }
        let haystack = normalize(&parts.join(" "));
        let price_value = parse_money(&listing.price);
        let effective_transaction = effective_transaction(&listing);
        let behavior_key = listing.behavior_key();
        Candidate {
            listing,
            parsed_location,
            haystack,
            price_value,
            effective_transaction,
            behavior_key,
        }
    }

    pub fn behavior_key(&self) -> &str {
        &self.behavior_key
    }
}

/// The raw `locationType` string wins over the enum when it carries a cue.
fn effective_transaction(listing: &Listing) -> TransactionKind {
    let Some(raw) = &listing.location_type else {
        return listing.transaction_kind;
    };
    let folded = normalize(raw);
    const SCAN: [TransactionKind; 7] = [
        TransactionKind::RentMonthly,
        TransactionKind::RentSixMonths,
        TransactionKind::RentTwelveMonths,
        TransactionKind::RentNightly,
        TransactionKind::RentShortStay,
        TransactionKind::Rent,
        TransactionKind::Sale,
    ];
    for kind in SCAN {
        if kind.cue_terms().iter().any(|t| folded.contains(t)) {
            return kind;
        }
    }
    listing.transaction_kind
}

// =============================================================================
// EVALUATION
// =============================================================================

/// Snapshots consulted by the scorer. All immutable for one render pass.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub now_ms: i64,
    pub behavior: &'a SearchBehavior,
    pub semantic: &'a SemanticScores,
    pub recommendations: &'a RecommendationBoosts,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub included: bool,
    pub score: f64,
}

impl Evaluation {
    const EXCLUDED: Evaluation = Evaluation { included: false, score: 0.0 };
}

/// Evaluate one candidate against the filter state.
///
/// `skip_amenity_inclusion` computes the parallel "context" result (all
/// predicates except amenity inclusion) that the AI preset engine uses for
/// count estimation.
pub fn evaluate(
    candidate: &Candidate,
    filters: &Filters,
    inputs: &ScoreInputs<'_>,
    skip_amenity_inclusion: bool,
) -> Evaluation {
    if !matches_transaction(candidate, filters.transaction)
        || !matches_category(candidate, filters.category.as_deref())
        || !matches_commune(candidate, &filters.commune)
        || !matches_district(candidate, &filters.district)
        || !matches_rooms(candidate, &filters.rooms)
        || !matches_price(candidate, filters.price_min, filters.price_max)
        || !matches_area(candidate, filters.area_min, filters.area_max)
        || !matches_counts(candidate, filters.beds_min, filters.baths_min)
        || !matches_photos(candidate, filters.photos_only)
        || !matches_published(candidate, filters, inputs.now_ms)
    {
        return Evaluation::EXCLUDED;
    }
    if !skip_amenity_inclusion
        && !filters.included_amenities.is_subset(candidate.listing.amenity_set())
    {
        return Evaluation::EXCLUDED;
    }
    if filters
        .excluded_amenities
        .iter()
        .any(|a| candidate.listing.amenity_set().contains(a))
    {
        return Evaluation::EXCLUDED;
    }

    let semantic = inputs.semantic.score(candidate.behavior_key());
    let Some(text_score) = text_signal(candidate, filters, semantic) else {
        return Evaluation::EXCLUDED;
    };

    let mut score = text_score;
    score += structured_bonus(filters);
    score += freshness(candidate, inputs.now_ms);
    score += photo_term(candidate);
    score += engagement(candidate, inputs.behavior);
    score += recommendation_boost(candidate, filters, inputs.recommendations);
    Evaluation { included: true, score }
}

// --- structured predicates ---------------------------------------------------

pub(crate) fn matches_transaction(candidate: &Candidate, filter: Option<TransactionKind>) -> bool {
    let Some(wanted) = filter else { return true };
    let effective = candidate.effective_transaction;
    match wanted {
        TransactionKind::Sale => effective == TransactionKind::Sale,
        // Generic rent accepts any rental variant.
        TransactionKind::Rent => effective.is_rental(),
        // Specific rental sub-types: exact kind, or the sub-type's synonym
        // terms appearing in the listing's own text.
        specific => {
            effective == specific
                || specific
                    .cue_terms()
                    .iter()
                    .any(|t| candidate.haystack.contains(t))
        }
    }
}

pub(crate) fn matches_category(candidate: &Candidate, filter: Option<&str>) -> bool {
    let Some(wanted) = filter else { return true };
    match &candidate.listing.category {
        Some(category) => normalize(category).contains(&normalize(wanted)),
        None => false,
    }
}

pub(crate) fn matches_commune(candidate: &Candidate, commune: &str) -> bool {
    commune.is_empty() || normalize(&candidate.parsed_location.commune) == normalize(commune)
}

pub(crate) fn matches_district(candidate: &Candidate, district: &str) -> bool {
    district.is_empty() || normalize(&candidate.parsed_location.district) == normalize(district)
}

/// Room compatibility: direct textual match, or numeric inference from the
/// bed count (`beds == pieces - 1`, `beds == pieces`, `>=` with a "+"
/// suffix, Studio implies at most one bed).
pub(crate) fn matches_rooms(candidate: &Candidate, token: &str) -> bool {
    if token.is_empty() {
        return true;
    }
    if candidate.haystack.contains(&normalize(token)) {
        return true;
    }
    let beds = candidate.listing.beds;
    match parse_rooms(token) {
        Some(RoomSpec::Studio) => beds <= 1,
        Some(RoomSpec::Pieces { count, plus }) => {
            let pieces = u32::from(count);
            if plus {
                beds + 1 >= pieces
            } else {
                beds + 1 == pieces || beds == pieces
            }
        }
        None => false,
    }
}

fn matches_price(candidate: &Candidate, min: Option<f64>, max: Option<f64>) -> bool {
    // Unparsable prices pass rather than hiding legitimate listings
    let Some(value) = candidate.price_value else { return true };
    if let Some(min) = min.filter(|m| m.is_finite()) {
        if value < min {
            return false;
        }
    }
    if let Some(max) = max.filter(|m| m.is_finite()) {
        if value > max {
            return false;
        }
    }
    true
}

fn matches_area(candidate: &Candidate, min: Option<f64>, max: Option<f64>) -> bool {
    let area = candidate.listing.area;
    if let Some(min) = min.filter(|m| m.is_finite()) {
        if area < min {
            return false;
        }
    }
    if let Some(max) = max.filter(|m| m.is_finite()) {
        if area > max {
            return false;
        }
    }
    true
}

fn matches_counts(candidate: &Candidate, beds_min: Option<u32>, baths_min: Option<u32>) -> bool {
    if let Some(min) = beds_min {
        if candidate.listing.beds < min {
            return false;
        }
    }
    if let Some(min) = baths_min {
        if candidate.listing.baths < min {
            return false;
        }
    }
    true
}

fn matches_photos(candidate: &Candidate, photos_only: bool) -> bool {
    !photos_only || !candidate.listing.images.is_empty()
}

fn matches_published(candidate: &Candidate, filters: &Filters, now_ms: i64) -> bool {
    let Some(days) = filters.published_within.days() else { return true };
    // Missing or unparsable dates pass, not exclude
    let Some(created) = candidate.listing.created_at else { return true };
    let age_ms = now_ms.saturating_sub(created);
    age_ms <= i64::from(days) * MS_PER_DAY
}

// --- text predicate & textual score ------------------------------------------

/// Vocabulary of folded words already explained by the structured filters, so
/// that e.g. a selected Sale filter doesn't penalize a query containing
/// "vente".
fn explained_vocabulary(filters: &Filters) -> BTreeSet<String> {
    let mut vocab = BTreeSet::new();
    let mut absorb = |text: &str| {
        for word in tokenize(text) {
            vocab.insert(word);
        }
    };
    if let Some(kind) = filters.transaction {
        for term in kind.cue_terms() {
            absorb(term);
        }
    }
    if let Some(category) = &filters.category {
        absorb(category);
        for variant in crate::alias::variants_of(category) {
            absorb(&variant);
        }
    }
    absorb(&filters.commune);
    absorb(&filters.district);
    absorb(&filters.rooms);
    for amenity in &filters.included_amenities {
        for term in amenity.cue_terms() {
            absorb(term);
        }
    }
    vocab
}

fn token_explained(token: &str, vocab: &BTreeSet<String>) -> bool {
    if vocab.contains(token) {
        return true;
    }
    crate::alias::variants_of(token)
        .iter()
        .any(|v| v.split_whitespace().all(|w| vocab.contains(w)))
}

/// Returns the textual score when the text predicate passes, `None` when it
/// fails.
fn text_signal(candidate: &Candidate, filters: &Filters, semantic: f64) -> Option<f64> {
    let query = filters.query.trim();
    if query.is_empty() {
        return Some(semantic * SEMANTIC_ONLY_WEIGHT);
    }
    let vocab = explained_vocabulary(filters);
    let tokens: Vec<String> = tokenize(query)
        .into_iter()
        .filter(|t| !token_explained(t, &vocab))
        .collect();
    if tokens.is_empty() {
        // Every token is absorbed by a structured filter
        return Some(semantic * SEMANTIC_WEIGHT);
    }

    let n = tokens.len();
    let literal = tokens
        .iter()
        .filter(|t| matches_text_literal(&candidate.haystack, t))
        .count();
    let expanded = tokens
        .iter()
        .filter(|t| matches_text(&candidate.haystack, t))
        .count();

    let literal_needed = if n <= 2 {
        n
    } else {
        ((TOKEN_MATCH_RATIO * n as f64).ceil() as usize).max(1)
    };
    let expanded_needed = ((ALIAS_MATCH_RATIO * n as f64).ceil() as usize).max(1);

    let passes = literal >= literal_needed
        || expanded >= expanded_needed
        || semantic >= SEMANTIC_MATCH_THRESHOLD;
    if !passes {
        return None;
    }

    let literal_ratio = literal as f64 / n as f64;
    let expanded_ratio = expanded as f64 / n as f64;
    Some(
        literal_ratio * TEXT_TOKEN_WEIGHT
            + expanded_ratio * ALIAS_TOKEN_WEIGHT
            + semantic * SEMANTIC_WEIGHT,
    )
}

// --- weak signals -------------------------------------------------------------

fn structured_bonus(filters: &Filters) -> f64 {
    let mut bonus = 0.0;
    if filters.transaction.is_some() {
        bonus += BONUS_TRANSACTION;
    }
    if filters.category.is_some() {
        bonus += BONUS_CATEGORY;
    }
    if !filters.commune.is_empty() {
        bonus += BONUS_COMMUNE;
    }
    if !filters.district.is_empty() {
        bonus += BONUS_DISTRICT;
    }
    if !filters.rooms.is_empty() {
        bonus += BONUS_ROOMS;
    }
    bonus
}

fn freshness(candidate: &Candidate, now_ms: i64) -> f64 {
    let Some(created) = candidate.listing.created_at else { return 0.0 };
    let age_days = now_ms.saturating_sub(created) as f64 / MS_PER_DAY as f64;
    (FRESHNESS_CEILING - age_days * FRESHNESS_DECAY_PER_DAY).max(0.0)
}

fn photo_term(candidate: &Candidate) -> f64 {
    candidate.listing.images.len().min(PHOTO_CAP) as f64 * PHOTO_WEIGHT
}

fn engagement(candidate: &Candidate, behavior: &SearchBehavior) -> f64 {
    let (views, favorites, contacts) = behavior.engagement(candidate.behavior_key());
    views as f64 * ENGAGEMENT_VIEW
        + favorites as f64 * ENGAGEMENT_FAVORITE
        + contacts as f64 * ENGAGEMENT_CONTACT
}

fn recommendation_boost(
    candidate: &Candidate,
    filters: &Filters,
    boosts: &RecommendationBoosts,
) -> f64 {
    let Some((normalized, rank)) = boosts.lookup(candidate.behavior_key()) else {
        return 0.0;
    };
    let mut boost = normalized * RECO_SCORE_WEIGHT + (1.0 / rank as f64) * RECO_RANK_WEIGHT;
    if !filters.query.trim().is_empty() {
        boost *= RECO_TYPING_DISCOUNT;
    }
    boost
}

// =============================================================================
// RANKING
// =============================================================================

/// An included candidate with its composite score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    pub index: usize,
    pub score: f64,
}

/// Sort included candidates per the active sort mode.
///
/// Relevance sorts by composite score; the other modes sort by the parsed
/// numeric field and ignore the score. All sorts are stable, so ties keep
/// input order.
pub fn rank(mut results: Vec<Ranked>, candidates: &[Candidate], sort: SortMode) -> Vec<Ranked> {
    match sort {
        SortMode::Relevance => {
            results.sort_by(|a, b| compare_f64_desc(a.score, b.score));
        }
        SortMode::Newest => {
            results.sort_by(|a, b| {
                compare_option_desc(
                    candidates[a.index].listing.created_at,
                    candidates[b.index].listing.created_at,
                )
            });
        }
        SortMode::PriceAsc => {
            results.sort_by(|a, b| {
                compare_option_asc(candidates[a.index].price_value, candidates[b.index].price_value)
            });
        }
        SortMode::PriceDesc => {
            results.sort_by(|a, b| {
                compare_option_desc(candidates[a.index].price_value, candidates[b.index].price_value)
            });
        }
        SortMode::AreaDesc => {
            results.sort_by(|a, b| {
                compare_f64_desc(candidates[a.index].listing.area, candidates[b.index].listing.area)
            });
        }
    }
    results
}

fn compare_f64_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// `None` sorts last in both directions.
fn compare_option_asc<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_option_desc<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AmenityKey;
    use std::collections::BTreeSet;

    fn communes() -> Vec<String> {
        vec!["Oran".into(), "Bir El Djir".into()]
    }

    fn listing(ref_code: &str) -> Listing {
        Listing {
            id: 1,
            ref_code: ref_code.into(),
            title: "Appartement vue mer".into(),
            transaction_kind: TransactionKind::Sale,
            location_type: None,
            category: Some("Appartement".into()),
            description: Some("Bel appartement lumineux".into()),
            price: "2 500 000 DZD".into(),
            location: "Canastel, Bir El Djir".into(),
            beds: 2,
            baths: 1,
            area: 95.0,
            created_at: None,
            images: vec!["a.jpg".into(), "b.jpg".into()],
            amenities: Some(BTreeSet::from([AmenityKey::VueMer, AmenityKey::DeuxBalcons])),
        }
    }

    fn inputs<'a>(
        behavior: &'a SearchBehavior,
        semantic: &'a SemanticScores,
        reco: &'a RecommendationBoosts,
    ) -> ScoreInputs<'a> {
        ScoreInputs { now_ms: 1_700_000_000_000, behavior, semantic, recommendations: reco }
    }

    #[test]
    fn test_room_inference_from_beds() {
        let candidate = Candidate::new(listing("ORN-1"), &communes());
        assert!(matches_rooms(&candidate, "F3"));
        assert!(matches_rooms(&candidate, "T3"));
        assert!(matches_rooms(&candidate, "F3+"));
        assert!(matches_rooms(&candidate, "F2"));
        assert!(!matches_rooms(&candidate, "F4"));
        assert!(!matches_rooms(&candidate, "Studio"));
    }

    #[test]
    fn test_price_bounds() {
        let candidate = Candidate::new(listing("ORN-1"), &communes());
        let filters = Filters { price_max: Some(2_500_000.0), ..Filters::default() };
        let behavior = SearchBehavior::default();
        let semantic = SemanticScores::default();
        let reco = RecommendationBoosts::default();
        let ins = inputs(&behavior, &semantic, &reco);
        assert!(evaluate(&candidate, &filters, &ins, false).included);

        let mut expensive = listing("ORN-2");
        expensive.price = "2 600 000".into();
        let candidate = Candidate::new(expensive, &communes());
        assert!(!evaluate(&candidate, &filters, &ins, false).included);
    }

    #[test]
    fn test_unparsable_price_passes() {
        let mut dirty = listing("ORN-3");
        dirty.price = "Prix sur demande".into();
        let candidate = Candidate::new(dirty, &communes());
        let filters = Filters { price_max: Some(1.0), ..Filters::default() };
        let behavior = SearchBehavior::default();
        let semantic = SemanticScores::default();
        let reco = RecommendationBoosts::default();
        assert!(evaluate(&candidate, &filters, &inputs(&behavior, &semantic, &reco), false).included);
    }

    #[test]
    fn test_generic_rent_accepts_variants() {
        let mut rental = listing("ORN-4");
        rental.transaction_kind = TransactionKind::RentMonthly;
        let candidate = Candidate::new(rental, &communes());
        assert!(matches_transaction(&candidate, Some(TransactionKind::Rent)));
        assert!(matches_transaction(&candidate, Some(TransactionKind::RentMonthly)));
        assert!(!matches_transaction(&candidate, Some(TransactionKind::Sale)));
    }

    #[test]
    fn test_location_type_overrides_enum() {
        let mut l = listing("ORN-5");
        l.transaction_kind = TransactionKind::Rent;
        l.location_type = Some("Location par nuit".into());
        let candidate = Candidate::new(l, &communes());
        assert_eq!(candidate.effective_transaction, TransactionKind::RentNightly);
    }

    #[test]
    fn test_explained_tokens_not_penalized() {
        // Filter already says Sale; the word "vente" in the query must not
        // count against the text predicate.
        let candidate = Candidate::new(listing("ORN-6"), &communes());
        let filters = Filters {
            query: "vente vue mer".into(),
            transaction: Some(TransactionKind::Sale),
            ..Filters::default()
        };
        let behavior = SearchBehavior::default();
        let semantic = SemanticScores::default();
        let reco = RecommendationBoosts::default();
        let eval = evaluate(&candidate, &filters, &inputs(&behavior, &semantic, &reco), false);
        assert!(eval.included);
    }

    #[test]
    fn test_context_set_skips_only_amenity_inclusion() {
        let candidate = Candidate::new(listing("ORN-7"), &communes());
        let filters = Filters {
            included_amenities: BTreeSet::from([AmenityKey::Piscine]),
            ..Filters::default()
        };
        let behavior = SearchBehavior::default();
        let semantic = SemanticScores::default();
        let reco = RecommendationBoosts::default();
        let ins = inputs(&behavior, &semantic, &reco);
        assert!(!evaluate(&candidate, &filters, &ins, false).included);
        assert!(evaluate(&candidate, &filters, &ins, true).included);

        // Exclusion still applies in the context set
        let excluded = Filters {
            excluded_amenities: BTreeSet::from([AmenityKey::VueMer]),
            ..Filters::default()
        };
        assert!(!evaluate(&candidate, &excluded, &ins, true).included);
    }

    #[test]
    fn test_evaluate_deterministic() {
        let candidate = Candidate::new(listing("ORN-8"), &communes());
        let filters = Filters { query: "vue mer".into(), ..Filters::default() };
        let behavior = SearchBehavior::default();
        let semantic = SemanticScores::default();
        let reco = RecommendationBoosts::default();
        let ins = inputs(&behavior, &semantic, &reco);
        let first = evaluate(&candidate, &filters, &ins, false);
        let second = evaluate(&candidate, &filters, &ins, false);
        assert_eq!(first, second);
        assert!(first.included);
        assert!(first.score > 0.0);
    }

    #[test]
    fn test_engagement_moves_score() {
        let candidate = Candidate::new(listing("ORN-9"), &communes());
        let filters = Filters::default();
        let semantic = SemanticScores::default();
        let reco = RecommendationBoosts::default();

        let cold = SearchBehavior::default();
        let base = evaluate(&candidate, &filters, &inputs(&cold, &semantic, &reco), false).score;

        let mut warm = SearchBehavior::default();
        warm.record_view("orn-9");
        warm.record_favorite("orn-9", true);
        warm.record_contact("orn-9");
        let boosted =
            evaluate(&candidate, &filters, &inputs(&warm, &semantic, &reco), false).score;
        let expected = ENGAGEMENT_VIEW + ENGAGEMENT_FAVORITE + ENGAGEMENT_CONTACT;
        assert!((boosted - base - expected).abs() < 1e-9);
    }

    #[test]
    fn test_reco_boost_discounted_while_typing() {
        let candidate = Candidate::new(listing("ORN-10"), &communes());
        let behavior = SearchBehavior::default();
        let semantic = SemanticScores::default();
        let reco = RecommendationBoosts::from_json(
            r#"{"ok": true, "recommendations": [{"ref": "ORN-10", "score": 1.0, "rank": 1}]}"#,
        );

        let idle = Filters::default();
        let typing = Filters { query: "vue mer".into(), ..Filters::default() };
        let ins = inputs(&behavior, &semantic, &reco);
        let idle_boost = recommendation_boost(&candidate, &idle, ins.recommendations);
        let typing_boost = recommendation_boost(&candidate, &typing, ins.recommendations);
        assert!((idle_boost - (RECO_SCORE_WEIGHT + RECO_RANK_WEIGHT)).abs() < 1e-9);
        assert!((typing_boost - idle_boost * RECO_TYPING_DISCOUNT).abs() < 1e-9);
    }

    #[test]
    fn test_sort_modes_ignore_score() {
        let a = Candidate::new(
            Listing { price: "3 000 000".into(), area: 50.0, ..listing("ORN-A") },
            &communes(),
        );
        let b = Candidate::new(
            Listing { price: "1 000 000".into(), area: 200.0, ..listing("ORN-B") },
            &communes(),
        );
        let candidates = vec![a, b];
        let results = vec![Ranked { index: 0, score: 99.0 }, Ranked { index: 1, score: 1.0 }];

        let by_price = rank(results.clone(), &candidates, SortMode::PriceAsc);
        assert_eq!(by_price[0].index, 1);
        let by_area = rank(results.clone(), &candidates, SortMode::AreaDesc);
        assert_eq!(by_area[0].index, 1);
        let by_relevance = rank(results, &candidates, SortMode::Relevance);
        assert_eq!(by_relevance[0].index, 0);
    }

    #[test]
    fn test_freshness_decay() {
        let now = 1_700_000_000_000;
        let mut fresh = listing("ORN-F");
        fresh.created_at = Some(now);
        let c = Candidate::new(fresh, &communes());
        assert!((freshness(&c, now) - FRESHNESS_CEILING).abs() < 1e-9);

        let mut old = listing("ORN-O");
        old.created_at = Some(now - 100 * MS_PER_DAY);
        let c = Candidate::new(old, &communes());
        assert_eq!(freshness(&c, now), 0.0);
    }
}
