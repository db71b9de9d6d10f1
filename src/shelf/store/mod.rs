//! # Storage Layer
//!
//! Every record collection (events, files, shortcuts, students) lives in memory
//! as a [`RecordStore`] and is mirrored to a single backing file per scope.
//!
//! ## Split of Responsibilities
//!
//! - [`backend::StorageBackend`] handles the raw bytes: where the backing file
//!   lives, how it is read, and how it is replaced on disk.
//! - [`snapshot`] turns a collection into the versioned JSON envelope and back.
//! - [`record_store::RecordStore`] owns the in-memory collection, applies
//!   mutations, and persists the whole collection after each one.
//!
//! ## Load Semantics
//!
//! - Missing or zero-length file: empty collection at revision 0.
//! - Anything else that fails to decode: [`ShelfError::Corrupt`]. The file is
//!   left in place so `shelf doctor` can report and quarantine it.
//!
//! ## Save Semantics
//!
//! Saves are whole-collection rewrites, done as write-to-temp then rename so a
//! crash never leaves a truncated file behind. Each snapshot carries a revision
//! counter; a handle only writes if the revision on disk is still the one it
//! loaded, otherwise the save fails with [`ShelfError::StaleRevision`] and the
//! in-memory change is rolled back.
//!
//! ## Storage Layout
//!
//! ```text
//! .shelf/
//! ├── config.json
//! ├── events.json
//! ├── files.json
//! ├── shortcuts.json
//! └── students.json
//! ```
//!
//! [`ShelfError::Corrupt`]: crate::error::ShelfError::Corrupt
//! [`ShelfError::StaleRevision`]: crate::error::ShelfError::StaleRevision

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod record_store;
pub mod snapshot;

pub use backend::StorageBackend;
pub use record_store::RecordStore;
