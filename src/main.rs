// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use samsar::behavior::{JsonFileStore, KvStore, MemoryStore, SessionStore};
use samsar::cli::{display, Cli, Commands};
use samsar::engine::SearchEngine;
use samsar::remote::{RecommendationBoosts, SemanticScores};
use samsar::score::ScoreInputs;
use samsar::types::{Listing, SortMode};

/// JSON payload shape shared by every subcommand.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    listings: Vec<Listing>,
    #[serde(default)]
    communes: Vec<String>,
    #[serde(default)]
    districts: Vec<DistrictEntry>,
}

/// Known district with its parent commune.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DistrictEntry {
    name: String,
    commune: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            data,
            query,
            limit,
            sort,
            store,
            semantic,
            recommendations,
        } => run_search(
            &data,
            &query,
            limit,
            sort.into(),
            store.as_deref(),
            semantic.as_deref(),
            recommendations.as_deref(),
        ),
        Commands::Suggest { data, query } => run_suggest(&data, &query),
        Commands::Presets { data, store } => run_presets(&data, store.as_deref()),
        Commands::Stats { store } => run_stats(&store),
    }
}

fn load_engine(path: &str) -> Result<SearchEngine> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading payload {path}"))?;
    let payload: Payload =
        serde_json::from_str(&raw).with_context(|| format!("parsing payload {path}"))?;
    let districts = payload
        .districts
        .into_iter()
        .map(|d| (d.name, d.commune))
        .collect();
    Ok(SearchEngine::new(payload.listings, payload.communes, districts))
}

fn open_store(path: Option<&str>) -> SessionStore {
    let kv: Box<dyn KvStore> = match path {
        Some(path) => Box::new(JsonFileStore::open(Path::new(path))),
        None => Box::new(MemoryStore::default()),
    };
    SessionStore::open(kv)
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[allow(clippy::too_many_arguments)]
fn run_search(
    data: &str,
    query: &str,
    limit: usize,
    sort: SortMode,
    store_path: Option<&str>,
    semantic_path: Option<&str>,
    reco_path: Option<&str>,
) -> Result<()> {
    let engine = load_engine(data)?;
    let mut store = open_store(store_path);

    let mut filters = engine.parse_query(query, &Default::default()).filters;
    filters.sort = sort;

    let semantic = match semantic_path {
        Some(path) => SemanticScores::from_json(
            &fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
        ),
        None => SemanticScores::default(),
    };
    let recommendations = match reco_path {
        Some(path) => RecommendationBoosts::from_json(
            &fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
        ),
        None => RecommendationBoosts::default(),
    };

    let behavior = store.behavior.clone();
    let inputs = ScoreInputs {
        now_ms: now_ms(),
        behavior: &behavior,
        semantic: &semantic,
        recommendations: &recommendations,
    };
    let outcome = engine.search(&filters, &inputs);
    store.record_query(query, outcome.zero);

    let label = if query.is_empty() {
        format!("RÉSULTATS ({})", outcome.ranked.len())
    } else {
        format!("RÉSULTATS · « {query} » ({})", outcome.ranked.len())
    };
    display::section_top(&label);
    for (rank, result) in outcome.ranked.iter().take(limit).enumerate() {
        display::print_result(rank + 1, &engine.candidates()[result.index], result.score);
    }
    if outcome.zero {
        display::row(" Aucune annonce ne correspond à ces critères.");
        display::row("");
        for (action, count) in engine.recovery(&filters, &inputs) {
            display::print_recovery(&action, count);
        }
    }
    display::section_bot();
    Ok(())
}

fn run_suggest(data: &str, query: &str) -> Result<()> {
    let engine = load_engine(data)?;
    let suggestions = engine.suggestions(query, &Default::default());
    display::section_top(&format!("SUGGESTIONS · « {query} »"));
    if suggestions.is_empty() {
        display::row(" (aucune suggestion)");
    }
    for suggestion in &suggestions {
        display::print_suggestion(suggestion);
    }
    display::section_bot();
    Ok(())
}

fn run_presets(data: &str, store_path: Option<&str>) -> Result<()> {
    let engine = load_engine(data)?;
    let store = open_store(store_path);
    let filters = Default::default();
    let behavior = store.behavior.clone();
    let inputs = ScoreInputs {
        now_ms: now_ms(),
        behavior: &behavior,
        semantic: &SemanticScores::default(),
        recommendations: &RecommendationBoosts::default(),
    };
    let outcome = engine.search(&filters, &inputs);
    let views = engine.preset_views(&filters, &outcome, &store, inputs.now_ms);
    display::section_top("PRESETS");
    for view in &views {
        display::print_preset(view);
    }
    if let Some(lead) = views.first() {
        let related = engine.related_presets(&lead.preset, &views, &outcome);
        if !related.is_empty() {
            display::row("");
            display::row(&format!(" Proche de « {} » :", lead.preset.label));
            for (preset, overlap) in &related {
                display::row(&format!("   {}  ({:.0} % de recouvrement)", preset.label, overlap * 100.0));
            }
        }
    }
    display::section_bot();
    Ok(())
}

fn run_stats(store_path: &str) -> Result<()> {
    let store = open_store(Some(store_path));
    let metrics = &store.metrics;
    display::section_top("MÉTRIQUES DE RECHERCHE");
    display::row(&format!(" Requêtes             {}", metrics.queries));
    display::row(&format!(
        " Sans résultat        {} ({:.0} %)",
        metrics.zero_results,
        metrics.zero_result_rate() * 100.0
    ));
    display::row(&format!(
        " Clics suggestion     {} (CTR {:.0} %)",
        metrics.suggestion_clicks,
        metrics.suggestion_ctr() * 100.0
    ));
    display::row(&format!(
        " Contacts             {} (conversion {:.0} %)",
        metrics.contacts_from_search,
        metrics.contact_conversion() * 100.0
    ));
    display::section_bot();
    Ok(())
}
