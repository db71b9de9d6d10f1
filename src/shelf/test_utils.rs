//! Shared fixtures for unit tests.

use crate::model::{Record, Scope};
use crate::store::mem_backend::MemBackend;
use crate::store::RecordStore;
use chrono::NaiveDate;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Open a project-scope store over a shared in-memory backend.
pub fn open_mem<R: Record>(backend: &MemBackend) -> RecordStore<R, &MemBackend> {
    RecordStore::open(backend, Scope::Project).unwrap()
}
