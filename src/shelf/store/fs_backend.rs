use super::backend::StorageBackend;
use crate::error::{Result, ShelfError};
use crate::model::{Scope, StoreKind};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug)]
pub struct FsBackend {
    project_root: Option<PathBuf>,
    global_root: PathBuf,
}

impl FsBackend {
    pub fn new(project_root: Option<PathBuf>, global_root: PathBuf) -> Self {
        Self {
            project_root,
            global_root,
        }
    }

    fn get_store_path_by_scope(&self, scope: Scope) -> Result<PathBuf> {
        let root = match scope {
            Scope::Project => self.project_root.as_ref().ok_or_else(|| {
                ShelfError::Store("No project scope available".to_string())
            })?,
            Scope::Global => &self.global_root,
        };
        Ok(root.clone())
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(ShelfError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_snapshot(&self, scope: Scope, kind: StoreKind) -> Result<Option<Vec<u8>>> {
        let path = self.snapshot_path(scope, kind)?;
        if !path.exists() {
            debug!(path = %path.display(), "no backing file yet");
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(ShelfError::Io)?;
        if bytes.is_empty() {
            debug!(path = %path.display(), "backing file is empty");
            return Ok(None);
        }
        Ok(Some(bytes))
    }

    fn write_snapshot(&self, scope: Scope, kind: StoreKind, bytes: &[u8]) -> Result<()> {
        let root = self.get_store_path_by_scope(scope)?;
        self.ensure_dir(&root)?;

        let target = root.join(kind.file_name());

        // Atomic Write
        let tmp_path = root.join(format!(".{}-{}.tmp", kind, Uuid::new_v4()));
        fs::write(&tmp_path, bytes).map_err(ShelfError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, &target) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ShelfError::Io(e));
        }

        debug!(path = %target.display(), bytes = bytes.len(), "wrote backing file");
        Ok(())
    }

    fn snapshot_path(&self, scope: Scope, kind: StoreKind) -> Result<PathBuf> {
        let root = self.get_store_path_by_scope(scope)?;
        Ok(root.join(kind.file_name()))
    }

    fn quarantine(&self, scope: Scope, kind: StoreKind) -> Result<Option<PathBuf>> {
        let path = self.snapshot_path(scope, kind)?;
        if !path.exists() {
            return Ok(None);
        }

        // The uuid suffix keeps two quarantines within one second apart.
        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        let tag = Uuid::new_v4().simple().to_string();
        let aside = path.with_file_name(format!(
            "{}.corrupt-{}-{}",
            kind.file_name(),
            stamp,
            &tag[..8]
        ));
        fs::rename(&path, &aside).map_err(ShelfError::Io)?;

        warn!(from = %path.display(), to = %aside.display(), "quarantined backing file");
        Ok(Some(aside))
    }

    fn scope_available(&self, scope: Scope) -> bool {
        self.get_store_path_by_scope(scope).is_ok()
    }
}
