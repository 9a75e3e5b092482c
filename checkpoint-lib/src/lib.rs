//! Core of Checkpoint: a personal game backlog kept in SQLite and mirrored in memory.

use std::path::PathBuf;

use thiserror::Error;

pub mod fs;
pub mod repository;

pub use repository::{BacklogReport, Field, Game, ImportSummary, Ownership, Repository, Status};

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the core can report. The [`Display`](std::fmt::Display) output of each variant
/// is meant to be shown to the user as-is.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Wrong value for {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("A game with id {0} already exists")]
    DuplicateId(u32),
    #[error("No game record with id {0}")]
    NotFound(u32),
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("File not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not write configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
