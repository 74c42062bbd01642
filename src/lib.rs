//! Client-side search, filtering and relevance ranking for real-estate
//! listings.
//!
//! The whole candidate set (a few thousand listings) lives in memory and is
//! re-evaluated on every keystroke or filter change. Matching is tolerant of
//! accents, spacing, hyphenation and small typos, understands French, Arabic
//! and English synonyms for places and property terms, and blends behavioral
//! signals and optional remote scores into the ranking.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │ text.rs  │──▶│ alias.rs │──▶│ fuzzy.rs │   folded text, variants,
//! └──────────┘   └──────────┘   └──────────┘   bounded edit distance
//!       │                            │
//!       ▼                            ▼
//! ┌─────────────┐   ┌──────────┐   ┌──────────┐
//! │ location.rs │──▶│ facets.rs│──▶│ intent.rs│   parsed places, catalogue,
//! └─────────────┘   └──────────┘   └──────────┘   query → structured filters
//!                         │              │
//!                         ▼              ▼
//! ┌──────────┐   ┌──────────┐   ┌────────────┐
//! │suggest.rs│   │ score.rs │◀──│ behavior.rs│   autocomplete, evaluation
//! └──────────┘   └──────────┘   └────────────┘   and ranking, session state
//!                      │
//!                      ▼
//! ┌──────────┐   ┌────────────┐   ┌───────────┐
//! │presets.rs│   │ recover.rs │   │ engine.rs │   preset rail, zero-result
//! └──────────┘   └────────────┘   └───────────┘   recovery, the façade
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use samsar::engine::SearchEngine;
//! use samsar::score::ScoreInputs;
//!
//! let engine = SearchEngine::new(listings, communes, districts);
//! let intent = engine.parse_query("t3 bir el djir vue mer", &Default::default());
//! let outcome = engine.search(&intent.filters, &inputs);
//! ```

pub mod alias;
pub mod behavior;
pub mod cli;
pub mod engine;
pub mod facets;
pub mod fuzzy;
pub mod intent;
pub mod location;
pub mod presets;
pub mod recover;
pub mod remote;
pub mod score;
pub mod suggest;
pub mod text;
pub mod types;

pub use engine::{SearchEngine, SearchOutcome};
pub use fuzzy::{levenshtein_within, matches_text, matches_text_literal};
pub use score::{evaluate, rank, Candidate, Evaluation, Ranked, ScoreInputs};
pub use text::{compact, normalize, tokenize};
pub use types::{
    AmenityKey, FacetKind, Filters, Listing, PublishedWithin, SearchSuggestion, SortMode,
    TransactionKind, ViewMode,
};
