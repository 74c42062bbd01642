// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Typed boundaries for the optional remote scoring services.
//!
//! Both services are weak signals, not dependencies: a disabled endpoint, a
//! failed fetch or a malformed payload degrades to an empty snapshot and the
//! scorer simply runs without that term. Nothing here blocks filtering.
//!
//! Timing is the caller's concern. The semantic lookup is meant to be
//! debounced (~[`SEMANTIC_DEBOUNCE_MS`]) after the query stabilizes, skipped
//! below [`SEMANTIC_MIN_QUERY_CHARS`] characters, and aborted when a newer
//! query supersedes it; the recommendation fetch is issued once per signed-in
//! session and aborted when the identity changes. The core only ever sees the
//! resulting immutable snapshots.

use crate::text::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Debounce window before issuing a semantic lookup.
pub const SEMANTIC_DEBOUNCE_MS: u64 = 460;

/// Queries shorter than this never hit the semantic endpoint.
pub const SEMANTIC_MIN_QUERY_CHARS: usize = 3;

// =============================================================================
// SEMANTIC SIMILARITY
// =============================================================================

/// Request shape for the semantic-similarity endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticRequest {
    pub query: String,
    pub limit: usize,
    pub min_similarity: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticHit {
    #[serde(rename = "ref")]
    pub ref_code: String,
    pub score: f64,
}

/// Response shape. `enabled: false` is a normal, non-error outcome.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SemanticResponse {
    pub enabled: bool,
    pub reason: Option<String>,
    pub results: Vec<SemanticHit>,
}

/// Per-listing semantic similarity snapshot, keyed by folded ref.
#[derive(Debug, Clone, Default)]
pub struct SemanticScores {
    by_ref: HashMap<String, f64>,
}

impl SemanticScores {
    /// Fold a response into a snapshot. Disabled responses yield an empty
    /// snapshot; scores are clamped to [0, 1].
    pub fn from_response(response: &SemanticResponse) -> Self {
        if !response.enabled {
            debug!(reason = ?response.reason, "semantic scoring disabled");
            return SemanticScores::default();
        }
        let by_ref = response
            .results
            .iter()
            .map(|hit| (normalize(&hit.ref_code), hit.score.clamp(0.0, 1.0)))
            .collect();
        SemanticScores { by_ref }
    }

    /// Parse a raw JSON payload, tolerating malformed input.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<SemanticResponse>(raw) {
            Ok(response) => Self::from_response(&response),
            Err(err) => {
                debug!(%err, "semantic payload malformed, ignoring");
                SemanticScores::default()
            }
        }
    }

    pub fn score(&self, behavior_key: &str) -> f64 {
        self.by_ref.get(behavior_key).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.by_ref.is_empty()
    }
}

// =============================================================================
// PERSONALIZED RECOMMENDATIONS
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "ref")]
    pub ref_code: String,
    pub score: f64,
    #[serde(default)]
    pub reason: Option<String>,
    pub rank: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationResponse {
    pub ok: bool,
    pub source: Option<String>,
    pub recommendations: Vec<Recommendation>,
}

/// Personalized boost snapshot: per ref, the score normalized by the list
/// maximum and the 1-based rank position.
#[derive(Debug, Clone, Default)]
pub struct RecommendationBoosts {
    by_ref: HashMap<String, (f64, usize)>,
}

impl RecommendationBoosts {
    pub fn from_response(response: &RecommendationResponse) -> Self {
        if !response.ok || response.recommendations.is_empty() {
            return RecommendationBoosts::default();
        }
        let max_score = response
            .recommendations
            .iter()
            .map(|r| r.score)
            .fold(0.0_f64, f64::max);
        if max_score <= 0.0 {
            return RecommendationBoosts::default();
        }
        let by_ref = response
            .recommendations
            .iter()
            .map(|r| {
                (normalize(&r.ref_code), (r.score / max_score, r.rank.max(1)))
            })
            .collect();
        RecommendationBoosts { by_ref }
    }

    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<RecommendationResponse>(raw) {
            Ok(response) => Self::from_response(&response),
            Err(err) => {
                debug!(%err, "recommendation payload malformed, ignoring");
                RecommendationBoosts::default()
            }
        }
    }

    /// (normalized score, rank) for a listing, if recommended.
    pub fn lookup(&self, behavior_key: &str) -> Option<(f64, usize)> {
        self.by_ref.get(behavior_key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ref.is_empty()
    }
}

// =============================================================================
// BEHAVIOR TELEMETRY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryKind {
    View,
    Favorite,
    Contact,
    SearchClick,
}

/// Fire-and-forget behavior event, emitted only for signed-in users.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    pub event_type: TelemetryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_ref: Option<String>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Best-effort event sink. Implementations must swallow failures.
pub trait TelemetrySink {
    fn send(&self, event: &TelemetryEvent);
}

/// Sink used when no user is signed in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn send(&self, _event: &TelemetryEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_semantic_response_is_empty() {
        let snapshot = SemanticScores::from_json(
            r#"{"enabled": false, "reason": "quota", "results": [{"ref": "A", "score": 0.9}]}"#,
        );
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.score("a"), 0.0);
    }

    #[test]
    fn test_semantic_scores_folded_and_clamped() {
        let snapshot = SemanticScores::from_json(
            r#"{"enabled": true, "results": [{"ref": "ORN-1", "score": 1.4}, {"ref": "ORN-2", "score": 0.61}]}"#,
        );
        assert_eq!(snapshot.score("orn-1"), 1.0);
        assert_eq!(snapshot.score("orn-2"), 0.61);
    }

    #[test]
    fn test_malformed_payload_tolerated() {
        assert!(SemanticScores::from_json("{oops").is_empty());
        assert!(RecommendationBoosts::from_json("[1,2,3]").is_empty());
    }

    #[test]
    fn test_recommendation_normalization() {
        let boosts = RecommendationBoosts::from_json(
            r#"{"ok": true, "source": "model", "recommendations": [
                {"ref": "ORN-1", "score": 0.8, "rank": 1},
                {"ref": "ORN-2", "score": 0.4, "rank": 2}
            ]}"#,
        );
        assert_eq!(boosts.lookup("orn-1"), Some((1.0, 1)));
        assert_eq!(boosts.lookup("orn-2"), Some((0.5, 2)));
        assert_eq!(boosts.lookup("orn-3"), None);
    }

    #[test]
    fn test_failed_fetch_degrades_to_no_boost() {
        let boosts = RecommendationBoosts::from_json(r#"{"ok": false}"#);
        assert!(boosts.is_empty());
    }
}
