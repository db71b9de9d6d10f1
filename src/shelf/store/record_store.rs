use super::backend::StorageBackend;
use super::snapshot;
use crate::error::{Result, ShelfError};
use crate::model::{Record, Scope};
use tracing::{debug, warn};

/// An in-memory collection of records mirrored to one backing file.
///
/// The handle is owned by whoever opened it; every mutating call rewrites the
/// whole collection before returning. A failed write leaves the in-memory
/// collection exactly as it was before the call.
#[derive(Debug)]
pub struct RecordStore<R: Record, B: StorageBackend> {
    backend: B,
    scope: Scope,
    revision: u64,
    records: Vec<R>,
}

impl<R: Record, B: StorageBackend> RecordStore<R, B> {
    /// Open the store for `scope`, loading whatever the backing file holds.
    pub fn open(backend: B, scope: Scope) -> Result<Self> {
        let mut store = Self {
            backend,
            scope,
            revision: 0,
            records: Vec::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Discard the in-memory state and read the backing file again.
    pub fn reload(&mut self) -> Result<&[R]> {
        let (revision, records) = match self.backend.read_snapshot(self.scope, R::KIND)? {
            None => (0, Vec::new()),
            Some(bytes) => {
                let path = self.backend.snapshot_path(self.scope, R::KIND)?;
                let snap = snapshot::decode::<R>(R::KIND, &bytes, &path).inspect_err(|e| {
                    warn!(kind = %R::KIND, "refusing to load backing file: {}", e);
                })?;
                (snap.revision, snap.records)
            }
        };
        debug!(kind = %R::KIND, revision, count = records.len(), "loaded store");
        self.revision = revision;
        self.records = records;
        Ok(&self.records)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, key: &str) -> Option<&R> {
        self.records.iter().find(|r| r.key() == key)
    }

    /// Case-insensitive substring match over each record's search field,
    /// in store order.
    pub fn search(&self, term: &str) -> Vec<&R> {
        let needle = term.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.search_text().to_lowercase().contains(&needle))
            .collect()
    }

    /// Persist the current collection.
    ///
    /// Fails with `StaleRevision` if someone else saved since this handle
    /// loaded; nothing is written in that case.
    pub fn save(&mut self) -> Result<()> {
        let found = self.disk_revision()?;
        if found != self.revision {
            warn!(
                kind = %R::KIND,
                expected = self.revision,
                found,
                "stale write rejected"
            );
            return Err(ShelfError::StaleRevision {
                kind: R::KIND,
                expected: self.revision,
                found,
            });
        }

        let next = self.revision + 1;
        let bytes = snapshot::encode(R::KIND, next, &self.records)?;
        self.backend.write_snapshot(self.scope, R::KIND, &bytes)?;
        self.revision = next;

        debug!(kind = %R::KIND, revision = next, count = self.records.len(), "saved store");
        Ok(())
    }

    /// Append a record and persist.
    pub fn add(&mut self, record: R) -> Result<()> {
        self.records.push(record);
        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Append a record unless one with the same key already exists.
    pub fn insert_unique(&mut self, record: R) -> Result<()> {
        let key = record.key();
        if self.find(&key).is_some() {
            return Err(ShelfError::AlreadyExists(key));
        }
        self.add(record)
    }

    /// Remove every record matching `pred` and persist.
    ///
    /// When nothing matches, the store is left untouched and no write happens;
    /// the returned list is empty.
    pub fn remove_where<F: FnMut(&R) -> bool>(&mut self, mut pred: F) -> Result<Vec<R>> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.records.len());
        for (idx, record) in std::mem::take(&mut self.records).into_iter().enumerate() {
            if pred(&record) {
                removed.push((idx, record));
            } else {
                kept.push(record);
            }
        }
        self.records = kept;

        if removed.is_empty() {
            return Ok(Vec::new());
        }

        if let Err(e) = self.save() {
            self.restore(removed);
            return Err(e);
        }
        Ok(removed.into_iter().map(|(_, r)| r).collect())
    }

    /// Remove only the `n`-th (0-based) record matching `pred`.
    pub fn remove_nth_where<F: FnMut(&R) -> bool>(&mut self, mut pred: F, n: usize) -> Result<Option<R>> {
        let position = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| pred(r))
            .nth(n)
            .map(|(idx, _)| idx);

        let Some(idx) = position else {
            return Ok(None);
        };

        let record = self.records.remove(idx);
        if let Err(e) = self.save() {
            self.records.insert(idx, record);
            return Err(e);
        }
        Ok(Some(record))
    }

    /// Apply `f` to the record with `key` and persist. Returns false if there
    /// is no such record.
    pub fn update_where<F: FnOnce(&mut R)>(&mut self, key: &str, f: F) -> Result<bool> {
        let Some(idx) = self.records.iter().position(|r| r.key() == key) else {
            return Ok(false);
        };

        let before = self.records[idx].clone();
        f(&mut self.records[idx]);
        if let Err(e) = self.save() {
            self.records[idx] = before;
            return Err(e);
        }
        Ok(true)
    }

    fn disk_revision(&self) -> Result<u64> {
        match self.backend.read_snapshot(self.scope, R::KIND)? {
            None => Ok(0),
            Some(bytes) => {
                let path = self.backend.snapshot_path(self.scope, R::KIND)?;
                Ok(snapshot::read_header(R::KIND, &bytes, &path)?.revision)
            }
        }
    }

    fn restore(&mut self, removed: Vec<(usize, R)>) {
        // Ascending original positions put every record back where it was.
        for (idx, record) in removed {
            self.records.insert(idx, record);
        }
    }
}
