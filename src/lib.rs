pub mod error;
pub mod executor;
pub mod row;
pub mod session;
pub mod statement;
pub mod table;

pub use error::{MetaCommandError, PrepareError, SessionError, TableError};
pub use executor::{Outcome, execute};
pub use row::{EMAIL_FIELD, Field, ID_FIELD, Row, SCHEMA, USERNAME_FIELD};
pub use session::{Control, MetaCommand, Session};
pub use statement::Statement;
pub use table::{Rows, Table};

pub const COLUMN_USERNAME_SIZE: usize = 32;
pub const COLUMN_EMAIL_SIZE: usize = 255;

// Text columns reserve one extra byte for the NUL terminator.
pub const ID_SIZE: usize = size_of::<u32>();
pub const USERNAME_SIZE: usize = COLUMN_USERNAME_SIZE + 1;
pub const EMAIL_SIZE: usize = COLUMN_EMAIL_SIZE + 1;
pub const ROW_SIZE: usize = EMAIL_FIELD.end();

pub const PAGE_SIZE: usize = 4096;
pub const TABLE_MAX_PAGES: usize = 100;
pub const ROWS_PER_PAGE: usize = PAGE_SIZE / ROW_SIZE;
pub const TABLE_MAX_ROWS: usize = ROWS_PER_PAGE * TABLE_MAX_PAGES;

const _: () = assert!(ROW_SIZE == ID_SIZE + USERNAME_SIZE + EMAIL_SIZE);
const _: () = assert!(ROWS_PER_PAGE > 0);
