use crate::commands::{CmdMessage, CmdResult, ShelfPaths};
use crate::error::Result;
use crate::model::Scope;
use std::fs;

pub fn run(paths: &ShelfPaths, scope: Scope) -> Result<CmdResult> {
    let dir = paths.scope_dir(scope)?;
    fs::create_dir_all(&dir)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Initialized shelf at {}",
        dir.display()
    )));
    Ok(result.with_paths(vec![dir]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_scope_dir() {
        let temp = TempDir::new().unwrap();
        let paths = ShelfPaths {
            project: Some(temp.path().join("proj/.shelf")),
            global: temp.path().join("global"),
        };

        run(&paths, Scope::Project).unwrap();
        assert!(temp.path().join("proj/.shelf").is_dir());
        assert!(!temp.path().join("global").exists());
    }

    #[test]
    fn project_scope_missing() {
        let temp = TempDir::new().unwrap();
        let paths = ShelfPaths {
            project: None,
            global: temp.path().join("global"),
        };
        assert!(run(&paths, Scope::Project).is_err());
        run(&paths, Scope::Global).unwrap();
        assert!(temp.path().join("global").is_dir());
    }
}
