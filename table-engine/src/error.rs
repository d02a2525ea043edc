//! FILENAME: table-engine/src/error.rs

use thiserror::Error;

/// Errors raised by invalid table configuration.
///
/// These are caller contract violations, surfaced to the configuring
/// collaborator and never silently corrected: ignoring a bad sort or
/// group reference would desynchronize the computed view from the
/// indicators the surrounding UI shows for it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Duplicate column key: {0}")]
    DuplicateColumn(String),

    #[error("Unknown column key: {0}")]
    UnknownColumn(String),

    #[error("Column is not sortable: {0}")]
    NotSortable(String),

    #[error("Column is not groupable: {0}")]
    NotGroupable(String),
}
