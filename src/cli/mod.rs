// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the samsar command-line interface.
//!
//! Four subcommands: `search` to filter and rank a listings payload,
//! `suggest` to preview autocomplete for a partial query, `presets` to show
//! the ordered AI preset rail, and `stats` to dump session search metrics.
//! All of them read the same JSON payload file; session state lives in an
//! optional JSON store file shared across runs.

pub mod display;

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::SortMode;

#[derive(Parser)]
#[command(
    name = "samsar",
    about = "Client-side listings search, filtering and relevance ranking",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Sort order, as exposed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Relevance,
    Newest,
    PriceAsc,
    PriceDesc,
    AreaDesc,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> SortMode {
        match arg {
            SortArg::Relevance => SortMode::Relevance,
            SortArg::Newest => SortMode::Newest,
            SortArg::PriceAsc => SortMode::PriceAsc,
            SortArg::PriceDesc => SortMode::PriceDesc,
            SortArg::AreaDesc => SortMode::AreaDesc,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a listings payload and display ranked results
    Search {
        /// Path to the JSON payload (listings, communes, districts)
        data: String,

        /// Free-text query; structured cues are extracted automatically
        #[arg(default_value = "")]
        query: String,

        /// Maximum number of results to display
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Sort order
        #[arg(long, value_enum, default_value = "relevance")]
        sort: SortArg,

        /// Session store file; omitted means in-memory only
        #[arg(long)]
        store: Option<String>,

        /// Optional semantic-similarity response JSON to blend into scores
        #[arg(long)]
        semantic: Option<String>,

        /// Optional recommendation response JSON to blend into scores
        #[arg(long)]
        recommendations: Option<String>,
    },

    /// Preview autocomplete suggestions for a partial query
    Suggest {
        /// Path to the JSON payload
        data: String,

        /// Partial query text
        query: String,
    },

    /// Show the ordered AI preset rail for the current catalogue
    Presets {
        /// Path to the JSON payload
        data: String,

        /// Session store file carrying preset stats and custom presets
        #[arg(long)]
        store: Option<String>,
    },

    /// Dump session search metrics from a store file
    Stats {
        /// Session store file
        store: String,
    },
}
