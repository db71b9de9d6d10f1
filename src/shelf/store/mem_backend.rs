use super::backend::StorageBackend;
use crate::error::{Result, ShelfError};
use crate::model::{Scope, StoreKind};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since shelf is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `StorageBackend` trait to use `&self` for all methods.
#[derive(Debug, Default)]
pub struct MemBackend {
    files: RefCell<HashMap<(Scope, StoreKind), Vec<u8>>>,
    quarantined: RefCell<Vec<(Scope, StoreKind, Vec<u8>)>>,
    simulate_write_error: RefCell<bool>,
    writes: RefCell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Test helper to place arbitrary bytes where a backing file would be,
    /// bypassing the write counter.
    pub fn set_raw(&self, scope: Scope, kind: StoreKind, bytes: &[u8]) {
        self.files.borrow_mut().insert((scope, kind), bytes.to_vec());
    }

    pub fn raw(&self, scope: Scope, kind: StoreKind) -> Option<Vec<u8>> {
        self.files.borrow().get(&(scope, kind)).cloned()
    }

    /// Number of successful snapshot writes so far.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }

    pub fn quarantined_count(&self) -> usize {
        self.quarantined.borrow().len()
    }
}

impl StorageBackend for MemBackend {
    fn read_snapshot(&self, scope: Scope, kind: StoreKind) -> Result<Option<Vec<u8>>> {
        let files = self.files.borrow();
        Ok(files
            .get(&(scope, kind))
            .filter(|bytes| !bytes.is_empty())
            .cloned())
    }

    fn write_snapshot(&self, scope: Scope, kind: StoreKind, bytes: &[u8]) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(ShelfError::Store("Simulated write error".to_string()));
        }
        self.files.borrow_mut().insert((scope, kind), bytes.to_vec());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn snapshot_path(&self, _scope: Scope, kind: StoreKind) -> Result<PathBuf> {
        Ok(PathBuf::from(format!("memory://{}", kind.file_name())))
    }

    fn quarantine(&self, scope: Scope, kind: StoreKind) -> Result<Option<PathBuf>> {
        match self.files.borrow_mut().remove(&(scope, kind)) {
            Some(bytes) => {
                self.quarantined.borrow_mut().push((scope, kind, bytes));
                Ok(Some(PathBuf::from(format!(
                    "memory://{}.corrupt",
                    kind.file_name()
                ))))
            }
            None => Ok(None),
        }
    }

    fn scope_available(&self, _scope: Scope) -> bool {
        true
    }
}
