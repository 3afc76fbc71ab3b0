//! Applies prepared statements to a [`Table`].

use tracing::debug;

use crate::error::TableError;
use crate::statement::Statement;
use crate::table::{Rows, Table};

/// What a successfully executed statement produced.
#[derive(Debug)]
pub enum Outcome<'a> {
    Inserted,
    Rows(Rows<'a>),
}

pub fn execute<'a>(
    statement: &Statement,
    table: &'a mut Table,
) -> Result<Outcome<'a>, TableError> {
    match statement {
        Statement::Insert(row) => {
            table.insert(row)?;
            debug!(id = row.id, rows = table.row_count(), "inserted row");
            Ok(Outcome::Inserted)
        }
        Statement::Select => {
            let table: &'a Table = table;
            Ok(Outcome::Rows(table.rows()))
        }
    }
}
