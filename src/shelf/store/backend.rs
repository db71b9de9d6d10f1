use crate::error::Result;
use crate::model::{Scope, StoreKind};
use std::path::PathBuf;

/// Abstract interface for raw snapshot I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while `RecordStore` handles the "what" (records, revisions, rollback).
pub trait StorageBackend {
    /// Read the raw backing file.
    /// Returns Ok(None) if the file does not exist or is zero-length.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_snapshot(&self, scope: Scope, kind: StoreKind) -> Result<Option<Vec<u8>>>;

    /// Replace the backing file.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write_snapshot(&self, scope: Scope, kind: StoreKind, bytes: &[u8]) -> Result<()>;

    /// Get the location of the backing file.
    /// For FsBackend, this is the real path. For MemBackend, a virtual path.
    fn snapshot_path(&self, scope: Scope, kind: StoreKind) -> Result<PathBuf>;

    /// Move an unreadable backing file out of the way.
    /// Returns the new location, or None if there was nothing to move.
    fn quarantine(&self, scope: Scope, kind: StoreKind) -> Result<Option<PathBuf>>;

    /// Check if a scope is available (e.g. project root exists).
    fn scope_available(&self, scope: Scope) -> bool;
}

impl<B: StorageBackend + ?Sized> StorageBackend for &B {
    fn read_snapshot(&self, scope: Scope, kind: StoreKind) -> Result<Option<Vec<u8>>> {
        (**self).read_snapshot(scope, kind)
    }

    fn write_snapshot(&self, scope: Scope, kind: StoreKind, bytes: &[u8]) -> Result<()> {
        (**self).write_snapshot(scope, kind, bytes)
    }

    fn snapshot_path(&self, scope: Scope, kind: StoreKind) -> Result<PathBuf> {
        (**self).snapshot_path(scope, kind)
    }

    fn quarantine(&self, scope: Scope, kind: StoreKind) -> Result<Option<PathBuf>> {
        (**self).quarantine(scope, kind)
    }

    fn scope_available(&self, scope: Scope) -> bool {
        (**self).scope_available(scope)
    }
}
