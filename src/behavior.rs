// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Persistent session state: engagement counters, metrics, favorites.
//!
//! Everything here goes through an injected key-value port ([`KvStore`])
//! holding JSON blobs under fixed keys. Reads are tolerant by contract: any
//! missing, malformed or wrongly-shaped blob falls back to the type's
//! default and logs a warning. Nothing in this module ever surfaces an error
//! to the search path.
//!
//! There is exactly one logical writer (the interactive session), so every
//! mutation writes back immediately and no read-modify-write race exists.

use crate::remote::{NullSink, TelemetryEvent, TelemetryKind, TelemetrySink};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Fixed storage keys, one per persisted blob.
pub mod keys {
    pub const FAVORITES: &str = "samsar.favorites";
    pub const SAVED_SEARCHES: &str = "samsar.saved_searches";
    pub const PRESET_STATS: &str = "samsar.ai_presets.stats";
    pub const CUSTOM_PRESETS: &str = "samsar.ai_presets.custom";
    pub const METRICS: &str = "samsar.search.metrics";
    pub const BEHAVIOR: &str = "samsar.search.behavior";
}

/// Recent queries kept per session profile.
const RECENT_QUERIES_CAP: usize = 20;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write store file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Generic string-keyed JSON blob store.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory store, the default for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.map.insert(key.to_string(), value);
    }
}

/// Single-file JSON store used by the CLI. The whole map is rewritten on
/// every set; blob sizes here are tiny.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    map: HashMap<String, String>,
}

impl JsonFileStore {
    /// Open a store file, tolerating a missing or malformed file.
    pub fn open(path: &Path) -> Self {
        let map = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "store file malformed, starting empty");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        JsonFileStore { path: path.to_path_buf(), map }
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(&self.map).unwrap_or_default();
        std::fs::write(&self.path, raw)
            .map_err(|source| StoreError::Write { path: self.path.clone(), source })
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.map.insert(key.to_string(), value);
        if let Err(err) = self.flush() {
            // Best-effort persistence; the session keeps its in-memory copy.
            warn!(%err, "store flush failed");
        }
    }
}

/// Read a JSON blob, falling back to `T::default()` on anything malformed.
pub fn load_json<T: DeserializeOwned + Default>(store: &dyn KvStore, key: &str) -> T {
    match store.get(key) {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(key, %err, "persisted blob malformed, using default");
            T::default()
        }),
        None => T::default(),
    }
}

/// Serialize and write a JSON blob.
pub fn save_json<T: Serialize>(store: &mut dyn KvStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.set(key, raw),
        Err(err) => warn!(key, %err, "failed to serialize blob"),
    }
}

// =============================================================================
// PER-LISTING BEHAVIOR
// =============================================================================

/// Per-listing engagement counters plus a capped recent-query list.
/// Keyed by the folded listing ref. Favorites may decrement on unfavorite;
/// views and contacts only grow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchBehavior {
    pub views: BTreeMap<String, u64>,
    pub favorites: BTreeMap<String, u64>,
    pub contacts: BTreeMap<String, u64>,
    pub recent_queries: Vec<String>,
}

impl SearchBehavior {
    pub fn record_view(&mut self, key: &str) {
        *self.views.entry(key.to_string()).or_default() += 1;
    }

    pub fn record_favorite(&mut self, key: &str, favorited: bool) {
        let counter = self.favorites.entry(key.to_string()).or_default();
        if favorited {
            *counter += 1;
        } else {
            *counter = counter.saturating_sub(1);
        }
    }

    pub fn record_contact(&mut self, key: &str) {
        *self.contacts.entry(key.to_string()).or_default() += 1;
    }

    /// Push a committed query onto the recent list (most recent first,
    /// deduplicated, capped).
    pub fn record_query(&mut self, query: &str) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return;
        }
        self.recent_queries.retain(|q| q != trimmed);
        self.recent_queries.insert(0, trimmed.to_string());
        self.recent_queries.truncate(RECENT_QUERIES_CAP);
    }

    pub fn engagement(&self, key: &str) -> (u64, u64, u64) {
        (
            self.views.get(key).copied().unwrap_or(0),
            self.favorites.get(key).copied().unwrap_or(0),
            self.contacts.get(key).copied().unwrap_or(0),
        )
    }
}

// =============================================================================
// AGGREGATE METRICS
// =============================================================================

/// Process-wide search counters. Incremented on debounced query commit,
/// zero-result detection, suggestion selection and contact action.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchMetrics {
    pub queries: u64,
    pub zero_results: u64,
    pub suggestion_clicks: u64,
    pub contacts_from_search: u64,
}

impl SearchMetrics {
    pub fn zero_result_rate(&self) -> f64 {
        ratio(self.zero_results, self.queries)
    }

    pub fn suggestion_ctr(&self) -> f64 {
        ratio(self.suggestion_clicks, self.queries)
    }

    pub fn contact_conversion(&self) -> f64 {
        ratio(self.contacts_from_search, self.queries)
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

// =============================================================================
// SESSION STORE
// =============================================================================

/// A saved search: a label plus a full filter snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub label: String,
    pub filters: crate::types::Filters,
}

/// Session-long handle over the persistence port. Loaded once at session
/// start; every mutation writes back through the port and mirrors the
/// interaction to the telemetry sink.
pub struct SessionStore {
    kv: Box<dyn KvStore>,
    sink: Box<dyn TelemetrySink>,
    pub behavior: SearchBehavior,
    pub metrics: SearchMetrics,
    pub favorites: BTreeSet<String>,
}

impl SessionStore {
    pub fn open(kv: Box<dyn KvStore>) -> Self {
        Self::open_with_sink(kv, Box::new(NullSink))
    }

    pub fn open_with_sink(kv: Box<dyn KvStore>, sink: Box<dyn TelemetrySink>) -> Self {
        let behavior = load_json(kv.as_ref(), keys::BEHAVIOR);
        let metrics = load_json(kv.as_ref(), keys::METRICS);
        let favorites = load_json(kv.as_ref(), keys::FAVORITES);
        SessionStore { kv, sink, behavior, metrics, favorites }
    }

    pub fn record_view(&mut self, key: &str) {
        self.behavior.record_view(key);
        self.persist_behavior();
        self.emit(TelemetryKind::View, Some(key), serde_json::Value::Null);
    }

    /// Toggle a favorite; returns the new state.
    pub fn toggle_favorite(&mut self, key: &str) -> bool {
        let favorited = if self.favorites.contains(key) {
            self.favorites.remove(key);
            false
        } else {
            self.favorites.insert(key.to_string());
            true
        };
        self.behavior.record_favorite(key, favorited);
        save_json(self.kv.as_mut(), keys::FAVORITES, &self.favorites);
        self.persist_behavior();
        self.emit(TelemetryKind::Favorite, Some(key), serde_json::json!({ "on": favorited }));
        favorited
    }

    pub fn record_contact(&mut self, key: &str) {
        self.behavior.record_contact(key);
        self.metrics.contacts_from_search += 1;
        self.persist_behavior();
        self.persist_metrics();
        self.emit(TelemetryKind::Contact, Some(key), serde_json::Value::Null);
    }

    pub fn record_query(&mut self, query: &str, zero_results: bool) {
        self.behavior.record_query(query);
        self.metrics.queries += 1;
        if zero_results {
            self.metrics.zero_results += 1;
        }
        self.persist_behavior();
        self.persist_metrics();
    }

    pub fn record_suggestion_click(&mut self, query: &str) {
        self.metrics.suggestion_clicks += 1;
        self.persist_metrics();
        self.emit(TelemetryKind::SearchClick, None, serde_json::json!({ "query": query }));
    }

    pub fn saved_searches(&self) -> Vec<SavedSearch> {
        load_json(self.kv.as_ref(), keys::SAVED_SEARCHES)
    }

    pub fn save_search(&mut self, saved: SavedSearch) {
        let mut all = self.saved_searches();
        all.retain(|s| s.label != saved.label);
        all.insert(0, saved);
        save_json(self.kv.as_mut(), keys::SAVED_SEARCHES, &all);
    }

    /// Typed access for other modules' blobs (AI preset stats, custom presets).
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        load_json(self.kv.as_ref(), key)
    }

    pub fn save<T: Serialize>(&mut self, key: &str, value: &T) {
        save_json(self.kv.as_mut(), key, value);
    }

    fn persist_behavior(&mut self) {
        let behavior = self.behavior.clone();
        save_json(self.kv.as_mut(), keys::BEHAVIOR, &behavior);
    }

    fn persist_metrics(&mut self) {
        let metrics = self.metrics;
        save_json(self.kv.as_mut(), keys::METRICS, &metrics);
    }

    fn emit(&self, kind: TelemetryKind, property_ref: Option<&str>, payload: serde_json::Value) {
        self.sink.send(&TelemetryEvent {
            event_type: kind,
            property_ref: property_ref.map(str::to_string),
            payload,
        });
    }
}
