//! # Shelf Architecture
//!
//! Shelf keeps a handful of small record collections (calendar events, uploaded
//! files, website shortcuts, student marks) in flat files, one per collection
//! and scope. It is a library with a CLI client on top; everything from the API
//! inward is UI-agnostic.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders output, sets up logging        │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Opens stores, applies config, normalizes selectors       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validation and business rules                            │
//! │  - Returns `CmdResult` with records and user messages       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - `RecordStore<R, B>` over a `StorageBackend`              │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the
//! process. User-facing outcomes, including validation failures, are returned
//! as [`commands::CmdMessage`]s; only real failures (I/O, corrupt files,
//! concurrent writers) come back as [`error::ShelfError`].
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: unit tests against `MemBackend`. Most tests live here.
//! 2. **Store**: load/save semantics, rollback and revision checks.
//! 3. **API**: dispatch and config plumbing.
//! 4. **CLI**: argument parsing and rendering, plus end-to-end runs of the
//!    binary in `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction, snapshot format and implementations
//! - [`model`]: Record types (`Event`, `StoredFile`, `Shortcut`, `Student`) and `Scope`
//! - [`config`]: Per-scope configuration
//! - [`init`]: Scope directory discovery
//! - [`error`]: Error types
//! - `cli`: Argument parsing and rendering for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod store;

#[cfg(test)]
mod test_utils;
