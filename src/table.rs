//! Append-only row storage split across lazily allocated pages.

use std::iter::FusedIterator;

use tracing::debug;

use crate::error::TableError;
use crate::row::Row;
use crate::{PAGE_SIZE, ROW_SIZE, ROWS_PER_PAGE, TABLE_MAX_PAGES};

type Page = Box<[u8]>;

#[derive(Debug)]
pub struct Table {
    num_rows: usize,
    max_pages: usize,
    // Grows on demand up to `max_pages` entries.
    pages: Vec<Option<Page>>,
}

impl Table {
    pub fn new() -> Self {
        Self::with_max_pages(TABLE_MAX_PAGES)
    }

    pub fn with_max_pages(max_pages: usize) -> Self {
        Self {
            num_rows: 0,
            max_pages,
            pages: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.num_rows
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn max_rows(&self) -> usize {
        self.max_pages.saturating_mul(ROWS_PER_PAGE)
    }

    pub fn is_full(&self) -> bool {
        self.num_rows >= self.max_rows()
    }

    /// Number of pages that have been allocated so far.
    pub fn page_count(&self) -> usize {
        self.pages.iter().filter(|page| page.is_some()).count()
    }

    /// Returns the bytes backing `row_num`, allocating its page on first touch.
    pub fn slot_for(&mut self, row_num: usize) -> Result<&mut [u8], TableError> {
        if row_num >= self.max_rows() {
            return Err(TableError::RowOutOfRange {
                row: row_num,
                max_rows: self.max_rows(),
            });
        }
        let page_num = row_num / ROWS_PER_PAGE;
        let byte_offset = (row_num % ROWS_PER_PAGE) * ROW_SIZE;

        if page_num >= self.pages.len() {
            self.pages
                .try_reserve(page_num + 1 - self.pages.len())
                .map_err(|source| TableError::Allocation {
                    page: page_num,
                    source,
                })?;
            self.pages.resize_with(page_num + 1, || None);
        }

        let page = match &mut self.pages[page_num] {
            Some(page) => page,
            slot @ None => slot.insert(allocate_page(page_num)?),
        };
        Ok(&mut page[byte_offset..byte_offset + ROW_SIZE])
    }

    fn slot(&self, row_num: usize) -> Option<&[u8]> {
        let page = self.pages.get(row_num / ROWS_PER_PAGE)?.as_deref()?;
        let byte_offset = (row_num % ROWS_PER_PAGE) * ROW_SIZE;
        Some(&page[byte_offset..byte_offset + ROW_SIZE])
    }

    /// Stores an encoded row after the last one.
    pub fn append(&mut self, encoded: &[u8; ROW_SIZE]) -> Result<(), TableError> {
        if self.is_full() {
            return Err(TableError::Full);
        }
        self.slot_for(self.num_rows)?.copy_from_slice(encoded);
        self.num_rows += 1;
        Ok(())
    }

    pub fn insert(&mut self, row: &Row) -> Result<(), TableError> {
        self.append(&row.encode())
    }

    /// Iterates over stored rows in insertion order.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            table: self,
            next: 0,
        }
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

fn allocate_page(page_num: usize) -> Result<Page, TableError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(PAGE_SIZE)
        .map_err(|source| TableError::Allocation {
            page: page_num,
            source,
        })?;
    buf.resize(PAGE_SIZE, 0);
    debug!(page = page_num, "allocated page");
    Ok(buf.into_boxed_slice())
}

/// Decoding iterator returned by [`Table::rows`].
#[derive(Debug)]
pub struct Rows<'a> {
    table: &'a Table,
    next: usize,
}

impl Iterator for Rows<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.next >= self.table.num_rows {
            return None;
        }
        let row = Row::deserialize(self.table.slot(self.next)?);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.table.num_rows.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

impl FusedIterator for Rows<'_> {}
