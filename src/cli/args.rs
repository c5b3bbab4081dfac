//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level command line.
#[derive(Parser)]
#[command(name = "slovar")]
#[command(about = "Russian–English dictionary with fuzzy search")]
#[command(version)]
pub struct Cli {
    /// Snapshot file to use instead of the default location
    #[arg(short = 'd', long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search the dictionary
    Search {
        /// Query; Cyrillic searches Russian forms, anything else English
        query: Vec<String>,

        /// Max amount of results
        #[arg(short = 'n', long, default_value = "3")]
        max: usize,

        /// Include words without a translation
        #[arg(short, long)]
        all: bool,

        /// Force fuzzy search
        #[arg(short, long, conflicts_with = "exact")]
        fuzzy: bool,

        /// Exact search only, never fall back to fuzzy
        #[arg(short, long)]
        exact: bool,
    },

    /// Build a snapshot from an OpenRussian TSV dump directory
    Build {
        /// Directory containing words.csv, translations.csv, ...
        dir: PathBuf,

        /// Where to write the snapshot (default: the default db location)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Display snapshot statistics
    Info,
}
