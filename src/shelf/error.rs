use crate::model::StoreKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing file exists and is non-empty but cannot be decoded.
    /// Distinct from an absent file, which simply means "no records yet".
    #[error("Corrupt store file {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// Another writer saved the store after this handle loaded it.
    #[error(
        "The {kind} store changed on disk (expected revision {expected}, found {found}); reload and retry"
    )]
    StaleRevision {
        kind: StoreKind,
        expected: u64,
        found: u64,
    },

    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ShelfError>;
