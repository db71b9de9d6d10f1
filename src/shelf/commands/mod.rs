use crate::error::{Result, ShelfError};
use crate::model::Scope;
use std::path::PathBuf;

pub mod age;
pub mod config;
pub mod doctor;
pub mod events;
pub mod export;
pub mod files;
pub mod init;
pub mod shortcuts;
pub mod students;

#[derive(Debug, Clone)]
pub struct ShelfPaths {
    pub project: Option<PathBuf>,
    pub global: PathBuf,
}

impl ShelfPaths {
    pub fn scope_dir(&self, scope: Scope) -> Result<PathBuf> {
        match scope {
            Scope::Project => self
                .project
                .clone()
                .ok_or_else(|| ShelfError::Store("Project scope is not available".to_string())),
            Scope::Global => Ok(self.global.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What a command hands back to the UI: records it changed, records it wants
/// shown, files it wrote, and messages for the user.
#[derive(Debug)]
pub struct CmdResult<T = ()> {
    pub affected: Vec<T>,
    pub listed: Vec<T>,
    pub paths: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl<T> Default for CmdResult<T> {
    fn default() -> Self {
        Self {
            affected: Vec::new(),
            listed: Vec::new(),
            paths: Vec::new(),
            messages: Vec::new(),
        }
    }
}

impl<T> CmdResult<T> {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_affected(mut self, items: Vec<T>) -> Self {
        self.affected = items;
        self
    }

    pub fn with_listed(mut self, items: Vec<T>) -> Self {
        self.listed = items;
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn has_level(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }

    /// Shorthand for a result that only carries a warning.
    pub fn warning(content: impl Into<String>) -> Self {
        Self::default().with_message(CmdMessage::warning(content))
    }
}
