use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the building/troop catalog. All of them are fatal.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Can't read catalog file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed catalog data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Catalog lists {found} {kind} entries, expected {expected}")]
    CountMismatch {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Catalog has no entry for {0}")]
    MissingEntry(String),

    #[error("Catalog lists {0} more than once")]
    DuplicateEntry(String),

    #[error("Catalog id {found} for {building} doesn't match game id {expected}")]
    IdMismatch {
        building: String,
        expected: u8,
        found: u8,
    },

    #[error("Catalog label {found:?} for {building} doesn't match game label {expected:?}")]
    LabelMismatch {
        building: String,
        expected: String,
        found: String,
    },

    #[error("Catalog entry {entry} has an invalid requirement: {reason}")]
    InvalidRequirement { entry: String, reason: String },
}
