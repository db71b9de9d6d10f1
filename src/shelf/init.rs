use crate::api::{ShelfApi, ShelfPaths};
use crate::error::{Result, ShelfError};
use crate::model::Scope;
use crate::store::fs_backend::FsBackend;
use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const GLOBAL_DATA_ENV: &str = "SHELF_GLOBAL_DATA";
const SCOPE_DIR: &str = ".shelf";

pub struct ShelfContext {
    pub api: ShelfApi<FsBackend>,
    pub scope: Scope,
}

/// Find the project root by walking up from cwd looking for a directory
/// that has both .git and .shelf. A directory with .git but no .shelf does not
/// stop the search, so a nested repo can use its parent's shelf.
/// Returns None if nothing matches before reaching home or root.
pub fn find_project_root(cwd: &Path) -> Option<PathBuf> {
    let home_dir = BaseDirs::new().map(|bd| bd.home_dir().to_path_buf());
    let mut current = cwd.to_path_buf();

    loop {
        if current.join(".git").exists() && current.join(SCOPE_DIR).exists() {
            return Some(current);
        }

        if let Some(ref home) = home_dir {
            if &current == home {
                return None;
            }
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// The global data directory: `$SHELF_GLOBAL_DATA` when set, else the
/// platform data dir.
pub fn global_data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(GLOBAL_DATA_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "shelf", "shelf")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ShelfError::Store("Could not determine the global data directory".into()))
}

pub fn initialize(cwd: &Path, use_global: bool) -> Result<ShelfContext> {
    let project_dir = find_project_root(cwd)
        .map(|root| root.join(SCOPE_DIR))
        .unwrap_or_else(|| cwd.join(SCOPE_DIR));
    let global_dir = global_data_dir()?;
    debug!(
        project = %project_dir.display(),
        global = %global_dir.display(),
        "resolved scope directories"
    );

    let scope = if use_global {
        Scope::Global
    } else {
        Scope::Project
    };

    let backend = FsBackend::new(Some(project_dir.clone()), global_dir.clone());
    let paths = ShelfPaths {
        project: Some(project_dir),
        global: global_dir,
    };

    Ok(ShelfContext {
        api: ShelfApi::new(backend, paths),
        scope,
    })
}
