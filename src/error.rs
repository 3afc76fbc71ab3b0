//! Error types for each stage of the command pipeline.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Rejections produced while turning a line into a [`Statement`](crate::Statement).
///
/// The `Display` text of each variant is the exact message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrepareError {
    #[error("Syntax error. Could not parse statement.")]
    SyntaxError,

    #[error("ID must be positive.")]
    NegativeId,

    #[error("String is too long.")]
    StringTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Unrecognized keyword at start of '{0}'.")]
    UnrecognizedStatement(String),
}

/// Dot-prefixed lines that are not a known meta-command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaCommandError {
    #[error("Unrecognized command '{0}'")]
    UnrecognizedCommand(String),
}

/// Failures raised by the paged table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Every page slot is in use; the insert was not applied.
    #[error("Error: Table full.")]
    Full,

    /// The row index lies beyond the table's page limit.
    #[error("row {row} is beyond the table capacity of {max_rows} rows")]
    RowOutOfRange { row: usize, max_rows: usize },

    /// A page buffer could not be obtained from the allocator.
    #[error("failed to allocate page {page}: {source}")]
    Allocation {
        page: usize,
        #[source]
        source: TryReserveError,
    },
}

impl TableError {
    /// Returns true for errors that must end the session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TableError::Allocation { .. })
    }
}

/// Errors that escape [`Session::handle_line`](crate::Session::handle_line).
///
/// Everything recoverable is rendered as a message instead.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}
