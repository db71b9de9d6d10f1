use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShelfError};
use crate::model::{mime_for_extension, FileCategory, StoredFile};
use crate::store::{RecordStore, StorageBackend};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file on its way into the store.
#[derive(Debug, Clone, Default)]
pub struct FileUpload {
    pub source_name: String,
    pub custom_name: Option<String>,
    pub mime: Option<String>,
    pub data: Vec<u8>,
}

impl FileUpload {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(ShelfError::Io)?;
        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            source_name,
            data,
            ..Self::default()
        })
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.custom_name = name.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn with_mime(mut self, mime: Option<String>) -> Self {
        self.mime = mime;
        self
    }

    fn stored_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(&self.source_name)
    }

    fn resolved_mime(&self) -> String {
        if let Some(mime) = &self.mime {
            return mime.clone();
        }
        let ext = Path::new(&self.source_name)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        mime_for_extension(&ext).to_string()
    }
}

pub fn add<B: StorageBackend>(
    store: &mut RecordStore<StoredFile, B>,
    upload: FileUpload,
    max_bytes: u64,
) -> Result<CmdResult<StoredFile>> {
    if upload.data.is_empty() || upload.stored_name().trim().is_empty() {
        return Ok(CmdResult::warning("Please upload a file."));
    }
    if upload.data.len() as u64 > max_bytes {
        return Ok(too_large(max_bytes));
    }

    let name = upload.stored_name().to_string();
    let mime = upload.resolved_mime();
    let file = StoredFile::new(name, mime, upload.data);
    store.add(file.clone())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("File '{}' added!", file.name)));
    Ok(result.with_affected(vec![file]))
}

/// Upload the file at `path`. Its size is checked against `max_bytes` before
/// any of it is read.
pub fn add_path<B: StorageBackend>(
    store: &mut RecordStore<StoredFile, B>,
    path: &Path,
    name: Option<String>,
    mime: Option<String>,
    max_bytes: u64,
) -> Result<CmdResult<StoredFile>> {
    let len = fs::metadata(path).map_err(ShelfError::Io)?.len();
    if len > max_bytes {
        debug!(path = %path.display(), bytes = len, "upload over the size limit");
        return Ok(too_large(max_bytes));
    }

    let upload = FileUpload::from_path(path)?.with_name(name).with_mime(mime);
    add(store, upload, max_bytes)
}

fn too_large(max_bytes: u64) -> CmdResult<StoredFile> {
    CmdResult::warning(format!(
        "File size exceeds the {} limit. Please upload a smaller file.",
        human_size(max_bytes)
    ))
}

/// Files in store order, optionally narrowed to one category.
pub fn list<B: StorageBackend>(
    store: &RecordStore<StoredFile, B>,
    category: Option<FileCategory>,
) -> Result<CmdResult<StoredFile>> {
    let files: Vec<StoredFile> = store
        .records()
        .iter()
        .filter(|f| category.map_or(true, |c| f.category() == c))
        .cloned()
        .collect();

    let mut result = CmdResult::default();
    if files.is_empty() {
        let message = match category {
            Some(c) => format!("No files in the {} category.", c),
            None => "No files uploaded yet.".to_string(),
        };
        result.add_message(CmdMessage::info(message));
    }
    Ok(result.with_listed(files))
}

pub fn search<B: StorageBackend>(
    store: &RecordStore<StoredFile, B>,
    term: &str,
) -> Result<CmdResult<StoredFile>> {
    if term.trim().is_empty() {
        return Ok(CmdResult::warning("Please enter a file name to search."));
    }

    let found: Vec<StoredFile> = store.search(term.trim()).into_iter().cloned().collect();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Found {} matching file(s):",
        found.len()
    )));
    Ok(result.with_listed(found))
}

/// Remove every file stored under `name`.
pub fn delete<B: StorageBackend>(
    store: &mut RecordStore<StoredFile, B>,
    name: &str,
) -> Result<CmdResult<StoredFile>> {
    let removed = store.remove_where(|f| f.name == name)?;
    if removed.is_empty() {
        return Ok(CmdResult::warning(format!("No file named '{}' found.", name)));
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("File '{}' deleted.", name)));
    Ok(result.with_affected(removed))
}

/// Write the bytes of the first file called `name` to `dest`. When `dest` is
/// an existing directory the stored name is used inside it.
pub fn export<B: StorageBackend>(
    store: &RecordStore<StoredFile, B>,
    name: &str,
    dest: &Path,
) -> Result<CmdResult<StoredFile>> {
    let Some(file) = store.find(name) else {
        return Ok(CmdResult::warning(format!("No file named '{}' found.", name)));
    };

    let target: PathBuf = if dest.is_dir() {
        dest.join(&file.name)
    } else {
        dest.to_path_buf()
    };
    fs::write(&target, &file.data).map_err(ShelfError::Io)?;
    debug!(path = %target.display(), bytes = file.size(), "exported file");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "File '{}' saved to {}.",
        file.name,
        target.display()
    )));
    Ok(result.with_paths(vec![target]))
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else if value.fract() == 0.0 {
        format!("{} {}", value as u64, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::open_mem;
    use tempfile::TempDir;

    fn upload(name: &str, data: &[u8]) -> FileUpload {
        FileUpload {
            source_name: name.to_string(),
            data: data.to_vec(),
            ..FileUpload::default()
        }
    }

    #[test]
    fn add_infers_mime_and_honours_custom_name() {
        let backend = MemBackend::new();
        let mut store = open_mem::<StoredFile>(&backend);

        add(&mut store, upload("report.PDF", b"%PDF-1.7"), 1024).unwrap();
        add(
            &mut store,
            upload("IMG_001.jpg", b"\xff\xd8").with_name(Some("holiday".into())),
            1024,
        )
        .unwrap();

        let names: Vec<_> = store.records().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["report.PDF", "holiday"]);
        assert_eq!(store.records()[0].category(), FileCategory::Pdfs);
        assert_eq!(store.records()[1].mime, "image/jpeg");
    }

    #[test]
    fn empty_upload_is_rejected() {
        let backend = MemBackend::new();
        let mut store = open_mem::<StoredFile>(&backend);

        let result = add(&mut store, upload("empty.pdf", b""), 1024).unwrap();
        assert!(result.has_level(MessageLevel::Warning));
        assert_eq!(result.messages[0].content, "Please upload a file.");
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let backend = MemBackend::new();
        let mut store = open_mem::<StoredFile>(&backend);

        let result = add(&mut store, upload("big.mp4", &[0u8; 2048]), 1024).unwrap();
        assert!(result.has_level(MessageLevel::Warning));
        assert!(result.messages[0].content.contains("1 KB"));
        assert!(store.is_empty());
    }

    #[test]
    fn list_by_category() {
        let backend = MemBackend::new();
        let mut store = open_mem::<StoredFile>(&backend);
        add(&mut store, upload("a.mp3", b"x"), 1024).unwrap();
        add(&mut store, upload("b.mkv", b"x"), 1024).unwrap();
        add(&mut store, upload("c.png", b"x"), 1024).unwrap();

        let videos = list(&store, Some(FileCategory::Videos)).unwrap();
        assert_eq!(videos.listed.len(), 1);
        assert_eq!(videos.listed[0].name, "b.mkv");

        let pdfs = list(&store, Some(FileCategory::Pdfs)).unwrap();
        assert!(pdfs.listed.is_empty());
        assert_eq!(pdfs.messages[0].content, "No files in the PDFs category.");

        assert_eq!(list(&store, None).unwrap().listed.len(), 3);
    }

    #[test]
    fn search_reports_count() {
        let backend = MemBackend::new();
        let mut store = open_mem::<StoredFile>(&backend);
        add(&mut store, upload("Lecture-1.pdf", b"x"), 1024).unwrap();
        add(&mut store, upload("lecture-2.pdf", b"x"), 1024).unwrap();

        let result = search(&store, "LECTURE").unwrap();
        assert_eq!(result.listed.len(), 2);
        assert_eq!(result.messages[0].content, "Found 2 matching file(s):");
    }

    #[test]
    fn delete_removes_all_with_name_and_reports_missing() {
        let backend = MemBackend::new();
        let mut store = open_mem::<StoredFile>(&backend);
        add(&mut store, upload("dup.pdf", b"1"), 1024).unwrap();
        add(&mut store, upload("dup.pdf", b"2"), 1024).unwrap();
        add(&mut store, upload("keep.pdf", b"3"), 1024).unwrap();

        let result = delete(&mut store, "dup.pdf").unwrap();
        assert_eq!(result.affected.len(), 2);
        assert_eq!(store.len(), 1);

        let writes = backend.write_count();
        let missing = delete(&mut store, "dup.pdf").unwrap();
        assert!(missing.has_level(MessageLevel::Warning));
        assert_eq!(backend.write_count(), writes);
    }

    #[test]
    fn export_writes_stored_bytes() {
        let backend = MemBackend::new();
        let mut store = open_mem::<StoredFile>(&backend);
        add(&mut store, upload("notes.pdf", b"%PDF-data"), 1024).unwrap();
        let temp = TempDir::new().unwrap();

        let result = export(&store, "notes.pdf", temp.path()).unwrap();
        let written = temp.path().join("notes.pdf");
        assert_eq!(result.paths, vec![written.clone()]);
        assert_eq!(fs::read(written).unwrap(), b"%PDF-data");

        let missing = export(&store, "other.pdf", temp.path()).unwrap();
        assert!(missing.has_level(MessageLevel::Warning));
    }

    #[test]
    fn upload_from_path_reads_bytes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("song.mp3");
        fs::write(&path, b"ID3").unwrap();

        let upload = FileUpload::from_path(&path).unwrap();
        assert_eq!(upload.source_name, "song.mp3");
        assert_eq!(upload.resolved_mime(), "audio/mpeg");
        assert_eq!(upload.data, b"ID3");
    }

    #[test]
    fn add_path_checks_size_on_disk() {
        let backend = MemBackend::new();
        let mut store = open_mem::<StoredFile>(&backend);
        let temp = TempDir::new().unwrap();
        let big = temp.path().join("lecture.mp4");
        fs::write(&big, vec![0u8; 2048]).unwrap();
        let small = temp.path().join("notes.pdf");
        fs::write(&small, b"%PDF").unwrap();

        let rejected = add_path(&mut store, &big, None, None, 1024).unwrap();
        assert!(rejected.messages[0].content.contains("exceeds the 1 KB limit"));
        assert_eq!(backend.write_count(), 0);

        let added = add_path(&mut store, &small, Some("week1".into()), None, 1024).unwrap();
        assert!(added.has_level(MessageLevel::Success));
        assert_eq!(store.records()[0].name, "week1");
        assert_eq!(store.records()[0].mime, "application/pdf");
    }

    #[test]
    fn add_path_missing_file_is_io_error() {
        let backend = MemBackend::new();
        let mut store = open_mem::<StoredFile>(&backend);
        let temp = TempDir::new().unwrap();

        let err = add_path(&mut store, &temp.path().join("gone.pdf"), None, None, 1024)
            .err()
            .unwrap();
        assert!(matches!(err, ShelfError::Io(_)));
    }

    #[test]
    fn human_sizes() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(1024), "1 KB");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(1024 * 1024 * 1024), "1 GB");
    }
}
