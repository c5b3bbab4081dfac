//! # slovar
//!
//! A Russian–English dictionary with approximate search.
//!
//! The crate loads a precompiled word snapshot (or ingests the raw
//! OpenRussian TSV dump) and answers exact and fuzzy lookups over both
//! Cyrillic and Latin queries. Fuzzy search combines a character-bigram
//! inverted index with Levenshtein re-ranking; queries are routed to the
//! Russian or English path by a Cyrillic code-point classifier.
//!
//! ## Example
//!
//! ```rust,ignore
//! use slovar::prelude::*;
//!
//! let words = slovar::serialization::load("db.bin".as_ref())?;
//! let dict = Dict::new(words);
//!
//! let (hits, cyrillic) = dict.search_fuzzy("драствуте", true, 10);
//! assert!(cyrillic);
//! for word in hits {
//!     println!("{}", word);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod distance;
pub mod ingest;
pub mod lexicon;
pub mod ngram;
pub mod search;
pub mod serialization;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::distance::{distance, edit_script, Edit, EditKind, EditScript};
    pub use crate::lexicon::{
        LanguageLevel, Stressed, Translation, Word, WordId, WordKind, Words,
    };
    pub use crate::ngram::NgramIndex;
    pub use crate::search::{is_cyrillic, Dict};
    pub use crate::serialization::SnapshotFormat;
}
