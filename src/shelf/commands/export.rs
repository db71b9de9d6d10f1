use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShelfError};
use crate::model::{Scope, StoreKind};
use crate::store::StorageBackend;
use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bundle every backing file present in `scope` into a tar.gz inside `dir`.
pub fn run<B: StorageBackend>(backend: &B, scope: Scope, dir: &Path) -> Result<CmdResult> {
    let mut entries = Vec::new();
    for kind in StoreKind::ALL {
        if let Some(bytes) = backend.read_snapshot(scope, kind)? {
            entries.push((kind, bytes));
        }
    }

    if entries.is_empty() {
        let mut res = CmdResult::default();
        res.add_message(CmdMessage::info("No stores to export."));
        return Ok(res);
    }

    let stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let (path, file) = create_archive_file(dir, &stamp)?;
    write_archive(file, &entries)?;
    debug!(path = %path.display(), stores = entries.len(), "wrote export archive");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} store(s) to {}",
        entries.len(),
        path.display()
    )));
    Ok(result.with_paths(vec![path]))
}

/// Create `shelf-<stamp>.tar.gz`, or `shelf-<stamp>-<n>.tar.gz` when an
/// archive with that stamp already exists. Never overwrites.
fn create_archive_file(dir: &Path, stamp: &str) -> Result<(PathBuf, File)> {
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            format!("shelf-{}.tar.gz", stamp)
        } else {
            format!("shelf-{}-{}.tar.gz", stamp, attempt)
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(ShelfError::Io(e)),
        }
    }
}

fn write_archive<W: Write>(writer: W, entries: &[(StoreKind, Vec<u8>)]) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    for (kind, bytes) in entries {
        let entry_name = format!("shelf/{}", kind.file_name());

        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();

        tar.append_data(&mut header, entry_name, bytes.as_slice())
            .map_err(ShelfError::Io)?;
    }

    tar.into_inner()
        .map_err(ShelfError::Io)?
        .finish()
        .map_err(ShelfError::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Shortcut;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::open_mem;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn unpack(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                let mut entry = entry.unwrap();
                let name = entry.path().unwrap().to_string_lossy().into_owned();
                let mut data = Vec::new();
                entry.read_to_end(&mut data).unwrap();
                (name, data)
            })
            .collect()
    }

    #[test]
    fn archive_holds_backing_files() {
        let entries = vec![
            (StoreKind::Events, b"{\"a\":1}".to_vec()),
            (StoreKind::Students, b"{\"b\":2}".to_vec()),
        ];
        let mut buf = Vec::new();
        write_archive(&mut buf, &entries).unwrap();

        let unpacked = unpack(&buf);
        assert_eq!(unpacked.len(), 2);
        assert_eq!(unpacked[0].0, "shelf/events.json");
        assert_eq!(unpacked[1].0, "shelf/students.json");
        assert_eq!(unpacked[1].1, b"{\"b\":2}");
    }

    #[test]
    fn export_writes_only_present_stores() {
        let backend = MemBackend::new();
        let mut store = open_mem::<Shortcut>(&backend);
        store
            .add(Shortcut::new("Docs", "https://docs.rs", None))
            .unwrap();
        let temp = TempDir::new().unwrap();

        let result = run(&backend, Scope::Project, temp.path()).unwrap();
        assert_eq!(result.paths.len(), 1);
        let name = result.paths[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("shelf-") && name.ends_with(".tar.gz"));

        let bytes = std::fs::read(&result.paths[0]).unwrap();
        let unpacked = unpack(&bytes);
        assert_eq!(unpacked.len(), 1);
        assert_eq!(unpacked[0].0, "shelf/shortcuts.json");
        assert_eq!(
            Some(unpacked[0].1.clone()),
            backend.raw(Scope::Project, StoreKind::Shortcuts)
        );
    }

    #[test]
    fn archive_names_do_not_collide() {
        let temp = TempDir::new().unwrap();
        let (first, _) = create_archive_file(temp.path(), "2024-01-01_00-00-00").unwrap();
        let (second, _) = create_archive_file(temp.path(), "2024-01-01_00-00-00").unwrap();

        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("2024-01-01_00-00-00-1.tar.gz"));
    }

    #[test]
    fn repeated_export_keeps_earlier_archive() {
        let backend = MemBackend::new();
        let mut store = open_mem::<Shortcut>(&backend);
        store
            .add(Shortcut::new("Docs", "https://docs.rs", None))
            .unwrap();
        let temp = TempDir::new().unwrap();

        let first = run(&backend, Scope::Project, temp.path()).unwrap();
        let second = run(&backend, Scope::Project, temp.path()).unwrap();

        assert_ne!(first.paths[0], second.paths[0]);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 2);
    }

    #[test]
    fn export_with_nothing_stored() {
        let backend = MemBackend::new();
        let temp = TempDir::new().unwrap();

        let result = run(&backend, Scope::Project, temp.path()).unwrap();
        assert!(result.paths.is_empty());
        assert_eq!(result.messages[0].content, "No stores to export.");
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
