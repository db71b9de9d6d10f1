//! Versioned JSON envelope for a store's backing file.
//!
//! ```json
//! { "format": 1, "kind": "events", "revision": 3, "records": [ ... ] }
//! ```

use crate::error::{Result, ShelfError};
use crate::model::StoreKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotOut<'a, R> {
    format: u32,
    kind: StoreKind,
    revision: u64,
    records: &'a [R],
}

#[derive(Deserialize)]
struct SnapshotIn<R> {
    format: u32,
    kind: StoreKind,
    revision: u64,
    records: Vec<R>,
}

/// Envelope fields without the records, for revision checks and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SnapshotHeader {
    pub format: u32,
    pub kind: StoreKind,
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<R> {
    pub revision: u64,
    pub records: Vec<R>,
}

pub fn encode<R: Serialize>(kind: StoreKind, revision: u64, records: &[R]) -> Result<Vec<u8>> {
    let out = SnapshotOut {
        format: FORMAT_VERSION,
        kind,
        revision,
        records,
    };
    serde_json::to_vec_pretty(&out).map_err(ShelfError::Serialization)
}

pub fn decode<R: DeserializeOwned>(kind: StoreKind, bytes: &[u8], path: &Path) -> Result<Snapshot<R>> {
    let parsed: SnapshotIn<R> =
        serde_json::from_slice(bytes).map_err(|e| corrupt(path, e.to_string()))?;
    check_envelope(kind, parsed.format, parsed.kind, path)?;
    Ok(Snapshot {
        revision: parsed.revision,
        records: parsed.records,
    })
}

pub fn read_header(kind: StoreKind, bytes: &[u8], path: &Path) -> Result<SnapshotHeader> {
    let header: SnapshotHeader =
        serde_json::from_slice(bytes).map_err(|e| corrupt(path, e.to_string()))?;
    check_envelope(kind, header.format, header.kind, path)?;
    Ok(header)
}

fn check_envelope(expected: StoreKind, format: u32, found: StoreKind, path: &Path) -> Result<()> {
    if format != FORMAT_VERSION {
        return Err(corrupt(
            path,
            format!("unsupported format version {}", format),
        ));
    }
    if found != expected {
        return Err(corrupt(
            path,
            format!("holds {} records, expected {}", found, expected),
        ));
    }
    Ok(())
}

fn corrupt(path: &Path, reason: String) -> ShelfError {
    ShelfError::Corrupt {
        path: path.to_path_buf(),
        reason,
    }
}
