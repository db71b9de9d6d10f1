use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShelfError};
use crate::model::{Event, Record, Scope, Shortcut, StoreKind, StoredFile, Student};
use crate::store::snapshot;
use crate::store::StorageBackend;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreHealth {
    Absent,
    Healthy { records: usize, revision: u64 },
    Corrupt { reason: String },
}

impl fmt::Display for StoreHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreHealth::Absent => f.write_str("absent"),
            StoreHealth::Healthy { records, revision } => {
                write!(f, "ok ({} records, revision {})", records, revision)
            }
            StoreHealth::Corrupt { reason } => write!(f, "corrupt: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreReport {
    pub kind: StoreKind,
    pub path: PathBuf,
    pub health: StoreHealth,
    /// Where a corrupt file was moved to, when repairing.
    pub quarantined: Option<PathBuf>,
}

fn inspect<R: Record, B: StorageBackend>(backend: &B, scope: Scope) -> Result<StoreHealth> {
    let Some(bytes) = backend.read_snapshot(scope, R::KIND)? else {
        return Ok(StoreHealth::Absent);
    };
    let path = backend.snapshot_path(scope, R::KIND)?;
    match snapshot::decode::<R>(R::KIND, &bytes, &path) {
        Ok(snap) => Ok(StoreHealth::Healthy {
            records: snap.records.len(),
            revision: snap.revision,
        }),
        Err(ShelfError::Corrupt { reason, .. }) => Ok(StoreHealth::Corrupt { reason }),
        Err(e) => Err(e),
    }
}

fn health_of<B: StorageBackend>(backend: &B, scope: Scope, kind: StoreKind) -> Result<StoreHealth> {
    match kind {
        StoreKind::Events => inspect::<Event, B>(backend, scope),
        StoreKind::Files => inspect::<StoredFile, B>(backend, scope),
        StoreKind::Shortcuts => inspect::<Shortcut, B>(backend, scope),
        StoreKind::Students => inspect::<Student, B>(backend, scope),
    }
}

/// Check every backing file in `scope`. With `repair`, corrupt files are
/// moved aside so the next load starts from an empty store.
pub fn run<B: StorageBackend>(
    backend: &B,
    scope: Scope,
    repair: bool,
) -> Result<CmdResult<StoreReport>> {
    let mut result = CmdResult::default();
    let mut reports = Vec::new();
    let mut corrupt = 0;

    for kind in StoreKind::ALL {
        let path = backend.snapshot_path(scope, kind)?;
        let health = health_of(backend, scope, kind)?;
        let mut quarantined = None;

        if let StoreHealth::Corrupt { reason } = &health {
            corrupt += 1;
            warn!(%kind, path = %path.display(), "corrupt backing file: {}", reason);
            if repair {
                quarantined = backend.quarantine(scope, kind)?;
                if let Some(moved) = &quarantined {
                    result.add_message(CmdMessage::warning(format!(
                        "Moved corrupt {} store to {}.",
                        kind,
                        moved.display()
                    )));
                }
            }
        }

        reports.push(StoreReport {
            kind,
            path,
            health,
            quarantined,
        });
    }

    if corrupt == 0 {
        result.add_message(CmdMessage::success("No problems found."));
    } else if !repair {
        result.add_message(CmdMessage::error(format!(
            "{} corrupt store file(s). Run with --repair to move them aside.",
            corrupt
        )));
    }

    Ok(result.with_listed(reports))
}
