//! Fixed-width row layout and its byte codec.
//!
//! A row is laid out as its fields back to back, in [`SCHEMA`] order:
//!
//! ```text
//! | id: u32 LE (4) | username: NUL-padded (33) | email: NUL-padded (256) |
//! ```

use std::fmt;
use std::ops::Range;

use crate::{EMAIL_SIZE, ID_SIZE, ROW_SIZE, USERNAME_SIZE};

/// A column's position inside an encoded row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

impl Field {
    const fn first(name: &'static str, width: usize) -> Self {
        Self {
            name,
            offset: 0,
            width,
        }
    }

    const fn followed_by(self, name: &'static str, width: usize) -> Self {
        Self {
            name,
            offset: self.end(),
            width,
        }
    }

    /// Byte offset just past this field.
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Longest text that fits, leaving room for the terminator.
    pub const fn text_capacity(&self) -> usize {
        self.width - 1
    }
}

pub const ID_FIELD: Field = Field::first("id", ID_SIZE);
pub const USERNAME_FIELD: Field = ID_FIELD.followed_by("username", USERNAME_SIZE);
pub const EMAIL_FIELD: Field = USERNAME_FIELD.followed_by("email", EMAIL_SIZE);

pub const SCHEMA: [Field; 3] = [ID_FIELD, USERNAME_FIELD, EMAIL_FIELD];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: String,
    pub email: String,
}

impl Row {
    pub fn new(id: u32, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Writes the row into `dest`, which must be exactly [`ROW_SIZE`] bytes.
    ///
    /// Text longer than its column is truncated; callers validate lengths
    /// beforehand so this never happens for prepared statements.
    pub fn serialize(&self, dest: &mut [u8]) {
        debug_assert_eq!(dest.len(), ROW_SIZE);
        dest[ID_FIELD.range()].copy_from_slice(&self.id.to_le_bytes());
        write_text(&mut dest[USERNAME_FIELD.range()], &self.username);
        write_text(&mut dest[EMAIL_FIELD.range()], &self.email);
    }

    pub fn deserialize(src: &[u8]) -> Self {
        debug_assert_eq!(src.len(), ROW_SIZE);
        let mut id = [0u8; ID_SIZE];
        id.copy_from_slice(&src[ID_FIELD.range()]);
        Self {
            id: u32::from_le_bytes(id),
            username: read_text(&src[USERNAME_FIELD.range()]),
            email: read_text(&src[EMAIL_FIELD.range()]),
        }
    }

    pub fn encode(&self) -> [u8; ROW_SIZE] {
        let mut buf = [0u8; ROW_SIZE];
        self.serialize(&mut buf);
        buf
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

fn write_text(dest: &mut [u8], text: &str) {
    let bytes = text.as_bytes();
    let len = bytes.len().min(dest.len() - 1);
    dest[..len].copy_from_slice(&bytes[..len]);
    dest[len..].fill(0);
}

fn read_text(src: &[u8]) -> String {
    let len = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8_lossy(&src[..len]).into_owned()
}
