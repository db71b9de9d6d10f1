//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every shelf operation, whatever UI sits on top.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Opens** the record store an operation needs, for the requested scope
//! - **Normalizes inputs** (e.g. turning a delete selector string into a position or a name)
//! - **Applies configuration** (upload limit, default top-N)
//! - **Dispatches** to the matching command function and returns `Result<CmdResult<T>>`
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Terminal I/O**: no stdout, stderr, or formatting
//!
//! ## Generic Over StorageBackend
//!
//! `ShelfApi<B: StorageBackend>` works with `FsBackend` in production and
//! `MemBackend` in tests. Every call opens a fresh `RecordStore` over a borrow
//! of the backend, so each call sees whatever was last saved.

use crate::commands;
use crate::config::ShelfConfig;
use crate::error::Result;
use crate::model::{Event, FileCategory, Record, Reminder, Scope, Shortcut, StoredFile, Student};
use crate::store::{RecordStore, StorageBackend};
use chrono::NaiveDate;
use std::path::Path;

pub struct ShelfApi<B: StorageBackend> {
    backend: B,
    paths: commands::ShelfPaths,
}

impl<B: StorageBackend> ShelfApi<B> {
    pub fn new(backend: B, paths: commands::ShelfPaths) -> Self {
        Self { backend, paths }
    }

    fn open<R: Record>(&self, scope: Scope) -> Result<RecordStore<R, &B>> {
        RecordStore::open(&self.backend, scope)
    }

    fn config(&self, scope: Scope) -> Result<ShelfConfig> {
        ShelfConfig::load(self.paths.scope_dir(scope)?)
    }

    // --- Events ---

    pub fn add_event(
        &self,
        scope: Scope,
        date: NaiveDate,
        name: &str,
        reminder: Reminder,
    ) -> Result<CmdResult<Event>> {
        commands::events::add(&mut self.open(scope)?, date, name, reminder)
    }

    pub fn list_events(&self, scope: Scope) -> Result<CmdResult<Event>> {
        commands::events::list(&self.open(scope)?)
    }

    pub fn events_on(&self, scope: Scope, date: NaiveDate) -> Result<CmdResult<Event>> {
        commands::events::on_date(&self.open(scope)?, date)
    }

    pub fn search_events(&self, scope: Scope, term: &str) -> Result<CmdResult<Event>> {
        commands::events::search(&self.open(scope)?, term)
    }

    /// `which` is a 0-based position among that day's events, or an event name.
    /// A number that matches no position is tried as a name, so events named
    /// "2024" can still be deleted.
    pub fn delete_event(&self, scope: Scope, date: NaiveDate, which: &str) -> Result<CmdResult<Event>> {
        let mut store = self.open(scope)?;
        let selector = parse_event_selector(which);
        let result = commands::events::delete(&mut store, date, &selector)?;
        if result.affected.is_empty() && matches!(selector, EventSelector::Position(_)) {
            let by_name = EventSelector::Name(which.trim().to_string());
            return commands::events::delete(&mut store, date, &by_name);
        }
        Ok(result)
    }

    pub fn reminders(&self, scope: Scope, today: NaiveDate) -> Result<CmdResult<Event>> {
        commands::events::reminders(&self.open(scope)?, today)
    }

    // --- Age utilities ---

    pub fn age(&self, dob: NaiveDate, today: NaiveDate) -> Result<CmdResult<Age>> {
        commands::age::age(dob, today)
    }

    pub fn compare_ages(&self, a: NaiveDate, b: NaiveDate, today: NaiveDate) -> Result<CmdResult<Age>> {
        commands::age::compare(a, b, today)
    }

    pub fn zodiac(&self, dob: NaiveDate) -> Result<CmdResult<ZodiacSign>> {
        commands::age::zodiac(dob)
    }

    // --- Files ---

    pub fn add_file(&self, scope: Scope, upload: FileUpload) -> Result<CmdResult<StoredFile>> {
        let max_bytes = self.config(scope)?.max_upload_bytes;
        commands::files::add(&mut self.open(scope)?, upload, max_bytes)
    }

    /// Upload a file from disk; the configured limit is checked before reading it.
    pub fn add_file_from_path(
        &self,
        scope: Scope,
        path: &Path,
        name: Option<String>,
        mime: Option<String>,
    ) -> Result<CmdResult<StoredFile>> {
        let max_bytes = self.config(scope)?.max_upload_bytes;
        commands::files::add_path(&mut self.open(scope)?, path, name, mime, max_bytes)
    }

    pub fn list_files(
        &self,
        scope: Scope,
        category: Option<FileCategory>,
    ) -> Result<CmdResult<StoredFile>> {
        commands::files::list(&self.open(scope)?, category)
    }

    pub fn search_files(&self, scope: Scope, term: &str) -> Result<CmdResult<StoredFile>> {
        commands::files::search(&self.open(scope)?, term)
    }

    pub fn delete_file(&self, scope: Scope, name: &str) -> Result<CmdResult<StoredFile>> {
        commands::files::delete(&mut self.open(scope)?, name)
    }

    pub fn export_file(&self, scope: Scope, name: &str, dest: &Path) -> Result<CmdResult<StoredFile>> {
        commands::files::export(&self.open(scope)?, name, dest)
    }

    // --- Shortcuts ---

    pub fn add_shortcut(
        &self,
        scope: Scope,
        name: &str,
        link: &str,
        icon: Option<Vec<u8>>,
    ) -> Result<CmdResult<Shortcut>> {
        commands::shortcuts::add(&mut self.open(scope)?, name, link, icon)
    }

    pub fn list_shortcuts(&self, scope: Scope) -> Result<CmdResult<Shortcut>> {
        commands::shortcuts::list(&self.open(scope)?)
    }

    pub fn search_shortcuts(&self, scope: Scope, term: &str) -> Result<CmdResult<Shortcut>> {
        commands::shortcuts::search(&self.open(scope)?, term)
    }

    pub fn delete_shortcut(&self, scope: Scope, name: &str) -> Result<CmdResult<Shortcut>> {
        commands::shortcuts::delete(&mut self.open(scope)?, name)
    }

    // --- Students ---

    pub fn add_student(&self, scope: Scope, student: NewStudent) -> Result<CmdResult<Student>> {
        commands::students::add(&mut self.open(scope)?, student)
    }

    pub fn record_marks(
        &self,
        scope: Scope,
        roll: &str,
        semester: u32,
        subject: &str,
        marks: u32,
    ) -> Result<CmdResult<Student>> {
        commands::students::record_marks(&mut self.open(scope)?, roll, semester, subject, marks)
    }

    pub fn results(&self, scope: Scope, branch: &str) -> Result<CmdResult<ResultRow>> {
        commands::students::results(&self.open(scope)?, branch)
    }

    /// Top students; `n` defaults to the scope's `top-students` setting.
    pub fn top_students(&self, scope: Scope, n: Option<usize>) -> Result<CmdResult<Ranked>> {
        let n = match n {
            Some(n) => n,
            None => self.config(scope)?.top_students,
        };
        commands::students::top(&self.open(scope)?, n)
    }

    pub fn first_student(&self, scope: Scope) -> Result<CmdResult<Ranked>> {
        commands::students::first(&self.open(scope)?)
    }

    pub fn student_details(&self, scope: Scope, roll: &str) -> Result<CmdResult<Student>> {
        commands::students::details(&self.open(scope)?, roll)
    }

    pub fn search_students(&self, scope: Scope, term: &str) -> Result<CmdResult<Student>> {
        commands::students::search(&self.open(scope)?, term)
    }

    pub fn branches(&self, scope: Scope) -> Result<CmdResult<String>> {
        commands::students::branches(&self.open(scope)?)
    }

    pub fn delete_student(&self, scope: Scope, roll: &str) -> Result<CmdResult<Student>> {
        commands::students::delete(&mut self.open(scope)?, roll)
    }

    // --- Maintenance ---

    pub fn doctor(&self, scope: Scope, repair: bool) -> Result<CmdResult<StoreReport>> {
        commands::doctor::run(&self.backend, scope, repair)
    }

    pub fn export(&self, scope: Scope, dir: &Path) -> Result<CmdResult> {
        commands::export::run(&self.backend, scope, dir)
    }

    pub fn config_action(
        &self,
        scope: Scope,
        action: ConfigAction,
    ) -> Result<CmdResult<(String, String)>> {
        commands::config::run(&self.paths, scope, action)
    }

    pub fn init(&self, scope: Scope) -> Result<CmdResult> {
        commands::init::run(&self.paths, scope)
    }

    pub fn paths(&self) -> &commands::ShelfPaths {
        &self.paths
    }
}

/// A bare number picks an event by position, anything else matches by name.
fn parse_event_selector(input: &str) -> EventSelector {
    match input.trim().parse::<usize>() {
        Ok(n) => EventSelector::Position(n),
        Err(_) => EventSelector::Name(input.to_string()),
    }
}

pub use crate::commands::age::{Age, ZodiacSign};
pub use crate::commands::config::ConfigAction;
pub use crate::commands::doctor::{StoreHealth, StoreReport};
pub use crate::commands::events::EventSelector;
pub use crate::commands::files::FileUpload;
pub use crate::commands::students::{NewStudent, Ranked, ResultRow};
pub use commands::{CmdMessage, CmdResult, MessageLevel, ShelfPaths};
