//! Command-line interface.
//!
//! The `search` command runs an exact search and falls back to fuzzy
//! search when nothing matched; the facade itself exposes both primitives
//! and this fallback policy lives here, in the calling layer.

mod args;
mod output;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::ingest;
use crate::search::Dict;
use crate::serialization;

pub use args::{Cli, Commands};

/// Default snapshot location under the user data directory.
fn default_db_path() -> Result<PathBuf> {
    let base = dirs::data_local_dir().context("Could not determine local data directory")?;
    Ok(base.join("slovar").join("db.bin"))
}

fn db_path(db: Option<PathBuf>) -> Result<PathBuf> {
    match db {
        Some(path) => Ok(path),
        None => default_db_path(),
    }
}

/// Parse arguments and run the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            max,
            all,
            fuzzy,
            exact,
        } => search(cli.db, query, max, all, fuzzy, exact),
        Commands::Build { dir, out } => build(cli.db, dir, out),
        Commands::Info => info(cli.db),
    }
}

fn load_dict(db: Option<PathBuf>) -> Result<Dict> {
    let path = db_path(db)?;
    let words = serialization::load(&path)
        .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;
    Ok(Dict::new(words))
}

fn search(
    db: Option<PathBuf>,
    query: Vec<String>,
    max: usize,
    all: bool,
    fuzzy: bool,
    exact: bool,
) -> Result<()> {
    let query = query.join(" ").trim().to_string();
    if query.is_empty() {
        bail!("please provide a query");
    }

    let dict = load_dict(db)?;

    let (mut results, _cyrillic) = if fuzzy {
        dict.search_fuzzy(&query, all, max)
    } else {
        dict.search(&query, all, max)
    };

    // Exact search found nothing: retry fuzzy unless disabled.
    if results.is_empty() && !fuzzy && !exact {
        results = dict.search_fuzzy(&query, all, max).0;
    }

    if results.is_empty() {
        println!("{}", "no results".dimmed());
        return Ok(());
    }

    for word in &results {
        output::print_word(dict.words(), word);
        println!();
    }

    Ok(())
}

fn build(db: Option<PathBuf>, dir: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let words = ingest::load_dump(&dir)
        .with_context(|| format!("Failed to ingest dump: {}", dir.display()))?;
    if words.is_empty() {
        bail!("dump produced no words: {}", dir.display());
    }

    let path = db_path(out.or(db))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    serialization::store(&path, &words)
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
    println!("{} entries written to {}", words.len(), path.display());
    Ok(())
}

fn info(db: Option<PathBuf>) -> Result<()> {
    let path = db_path(db)?;
    let dict = load_dict(Some(path.clone()))?;
    let words = dict.words();

    let translated = words.iter().filter(|w| w.has_translations()).count();
    let derived = words.iter().filter(|w| w.derived_from.is_some()).count();

    println!("snapshot:   {}", path.display());
    println!("entries:    {}", words.len());
    println!("translated: {translated}");
    println!("derived:    {derived}");
    Ok(())
}
