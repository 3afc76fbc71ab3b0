//! Routes input lines to meta-commands or to the statement pipeline.

use std::io::Write;

use tracing::{debug, info};

use crate::error::{MetaCommandError, SessionError};
use crate::executor::{Outcome, execute};
use crate::statement::Statement;
use crate::table::Table;

// Non-SQL statements like .exit are called “meta-commands”.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
}

impl MetaCommand {
    /// Returns `None` when `input` is not a meta-command at all.
    pub fn parse(input: &str) -> Option<Result<MetaCommand, MetaCommandError>> {
        match input {
            ".exit" => Some(Ok(MetaCommand::Exit)),
            _ if input.starts_with('.') => Some(Err(MetaCommandError::UnrecognizedCommand(
                input.to_string(),
            ))),
            _ => None,
        }
    }
}

/// Whether the prompt loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

#[derive(Debug, Default)]
pub struct Session {
    table: Table,
}

impl Session {
    pub fn new(table: Table) -> Self {
        info!(max_rows = table.max_rows(), "session started");
        Self { table }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Handles one trimmed input line, writing all user-facing output to `out`.
    ///
    /// Recoverable errors are written as messages; only fatal table errors
    /// and output failures are returned.
    pub fn handle_line<W: Write>(
        &mut self,
        line: &str,
        out: &mut W,
    ) -> Result<Control, SessionError> {
        match MetaCommand::parse(line) {
            Some(Ok(MetaCommand::Exit)) => {
                self.close();
                return Ok(Control::Exit);
            }
            Some(Err(err)) => {
                writeln!(out, "{err}")?;
                return Ok(Control::Continue);
            }
            None => {}
        }

        let statement = match Statement::prepare(line) {
            Ok(statement) => statement,
            Err(err) => {
                writeln!(out, "{err}")?;
                return Ok(Control::Continue);
            }
        };

        match execute(&statement, &mut self.table) {
            Ok(Outcome::Inserted) => {}
            Ok(Outcome::Rows(rows)) => {
                for row in rows {
                    writeln!(out, "{row}")?;
                }
            }
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => {
                writeln!(out, "{err}")?;
                return Ok(Control::Continue);
            }
        }
        writeln!(out, "Executed.")?;
        Ok(Control::Continue)
    }

    fn close(&mut self) {
        let table = std::mem::take(&mut self.table);
        debug!(rows = table.row_count(), pages = table.page_count(), "releasing table");
        drop(table);
    }
}
