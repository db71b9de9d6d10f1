use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Shortcut;
use crate::store::{RecordStore, StorageBackend};
use url::Url;

/// Check that `link` is an absolute http(s) URL with a host.
fn validate_link(link: &str) -> std::result::Result<Url, String> {
    let parsed = Url::parse(link.trim()).map_err(|e| format!("Invalid URL '{}': {}", link, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(format!(
            "Only http and https links are allowed, got '{}'.",
            parsed.scheme()
        ));
    }
    if parsed.host_str().is_none() {
        return Err(format!("Link '{}' has no host.", link));
    }
    Ok(parsed)
}

pub fn add<B: StorageBackend>(
    store: &mut RecordStore<Shortcut, B>,
    name: &str,
    link: &str,
    icon: Option<Vec<u8>>,
) -> Result<CmdResult<Shortcut>> {
    let name = name.trim();
    if name.is_empty() || link.trim().is_empty() {
        return Ok(CmdResult::warning("Please enter both a name and a link."));
    }
    if let Err(reason) = validate_link(link) {
        return Ok(CmdResult::warning(reason));
    }

    let shortcut = Shortcut::new(name, link.trim(), icon);
    store.add(shortcut.clone())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Shortcut '{}' added!", name)));
    Ok(result.with_affected(vec![shortcut]))
}

pub fn list<B: StorageBackend>(store: &RecordStore<Shortcut, B>) -> Result<CmdResult<Shortcut>> {
    let mut result = CmdResult::default();
    if store.is_empty() {
        result.add_message(CmdMessage::info("No shortcuts added yet."));
    }
    Ok(result.with_listed(store.records().to_vec()))
}

pub fn search<B: StorageBackend>(
    store: &RecordStore<Shortcut, B>,
    term: &str,
) -> Result<CmdResult<Shortcut>> {
    if term.trim().is_empty() {
        return Ok(CmdResult::warning("Please enter a shortcut name to search."));
    }

    let found: Vec<Shortcut> = store.search(term.trim()).into_iter().cloned().collect();
    let mut result = CmdResult::default();
    if found.is_empty() {
        result.add_message(CmdMessage::info("No shortcuts found."));
    }
    Ok(result.with_listed(found))
}

pub fn delete<B: StorageBackend>(
    store: &mut RecordStore<Shortcut, B>,
    name: &str,
) -> Result<CmdResult<Shortcut>> {
    let removed = store.remove_where(|s| s.name == name)?;
    if removed.is_empty() {
        return Ok(CmdResult::warning(format!(
            "No shortcut named '{}' found.",
            name
        )));
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Shortcut '{}' deleted.", name)));
    Ok(result.with_affected(removed))
}
