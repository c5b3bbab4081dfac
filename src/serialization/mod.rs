//! Word-collection snapshot persistence.
//!
//! A snapshot is the serialized form of a merged [`Words`] collection, so
//! the expensive TSV ingestion runs once at build time and lookups start
//! from a single binary load. Bincode is the default format, with gzip
//! compression behind the `compression` feature and JSON for debugging.
//!
//! # Example
//!
//! ```rust,ignore
//! use slovar::serialization;
//!
//! let words = serialization::load("db.bin".as_ref())?;
//! serialization::store("db.json".as_ref(), &words)?;
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Instant;

use log::debug;

use crate::lexicon::Words;

/// Errors that can occur while encoding, decoding or storing snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Error during bincode serialization
    #[error("Bincode error")]
    Bincode(#[from] bincode::Error),
    /// Error during JSON serialization
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
    /// I/O error
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// Snapshot encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Plain bincode.
    Bincode,
    /// Gzip-compressed bincode.
    #[cfg(feature = "compression")]
    BincodeGzip,
    /// Pretty-printed JSON, for inspection.
    Json,
}

impl SnapshotFormat {
    /// Infer the format from a file extension; unknown extensions mean
    /// plain bincode.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            #[cfg(feature = "compression")]
            Some("gz") => Self::BincodeGzip,
            _ => Self::Bincode,
        }
    }

    /// Canonical file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Bincode => "bin",
            #[cfg(feature = "compression")]
            Self::BincodeGzip => "gz",
            Self::Json => "json",
        }
    }
}

/// Serialize `words` to a writer.
pub fn encode<W: Write>(
    words: &Words,
    writer: W,
    format: SnapshotFormat,
) -> Result<(), SnapshotError> {
    match format {
        SnapshotFormat::Bincode => bincode::serialize_into(writer, words)?,
        #[cfg(feature = "compression")]
        SnapshotFormat::BincodeGzip => {
            let encoder = flate2::write::GzEncoder::new(writer, flate2::Compression::default());
            bincode::serialize_into(encoder, words)?;
        }
        SnapshotFormat::Json => serde_json::to_writer(writer, words)?,
    }
    Ok(())
}

/// Deserialize a word collection from a reader.
pub fn decode<R: Read>(reader: R, format: SnapshotFormat) -> Result<Words, SnapshotError> {
    let words = match format {
        SnapshotFormat::Bincode => bincode::deserialize_from(reader)?,
        #[cfg(feature = "compression")]
        SnapshotFormat::BincodeGzip => {
            bincode::deserialize_from(flate2::read::GzDecoder::new(reader))?
        }
        SnapshotFormat::Json => serde_json::from_reader(reader)?,
    };
    Ok(words)
}

/// Store a snapshot at `path`, inferring the format from its extension.
///
/// Writes to a sibling temp file and renames into place, so a crashed
/// build never leaves a truncated snapshot behind.
pub fn store(path: &Path, words: &Words) -> Result<(), SnapshotError> {
    let format = SnapshotFormat::from_path(path);
    let tmp = path.with_extension(format!("{}.tmp", format.extension()));

    let file = File::create(&tmp)?;
    let result = encode(words, BufWriter::new(file), format);
    if let Err(err) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(err);
    }

    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Load a snapshot from `path`, inferring the format from its extension.
pub fn load(path: &Path) -> Result<Words, SnapshotError> {
    let start = Instant::now();
    let file = File::open(path)?;
    let words = decode(BufReader::new(file), SnapshotFormat::from_path(path))?;
    debug!(
        "loaded {} entries from {} in {:?}",
        words.len(),
        path.display(),
        start.elapsed()
    );
    Ok(words)
}
