//! Parsing of the two statement shapes: `insert <id> <username> <email>` and `select`.

use tracing::debug;

use crate::error::PrepareError;
use crate::row::{EMAIL_FIELD, Field, Row, USERNAME_FIELD};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

impl Statement {
    /// Classifies and validates one trimmed input line.
    pub fn prepare(input: &str) -> Result<Statement, PrepareError> {
        let result = if input.starts_with("insert") {
            prepare_insert(input)
        } else if is_select(input) {
            Ok(Statement::Select)
        } else {
            Err(PrepareError::UnrecognizedStatement(input.to_string()))
        };

        if let Err(err) = &result {
            debug!(input, ?err, "statement rejected");
        }
        result
    }
}

fn is_select(input: &str) -> bool {
    match input.strip_prefix("select") {
        Some(rest) => matches!(rest.bytes().next(), None | Some(b' ' | b'\n' | b'\r')),
        None => false,
    }
}

// The email is read up to the end of the line, so it may contain spaces
// while the username may not.
fn prepare_insert(input: &str) -> Result<Statement, PrepareError> {
    let mut tokens = Tokenizer::new(input);
    let _keyword = tokens.next_token(" ");
    let id = tokens.next_token(" ");
    let username = tokens.next_token(" ");
    let email = tokens.next_token("\n");

    let (Some(id), Some(username), Some(email)) = (id, username, email) else {
        return Err(PrepareError::SyntaxError);
    };

    let id = parse_id(id)?;
    check_text(&USERNAME_FIELD, username)?;
    check_text(&EMAIL_FIELD, email)?;

    Ok(Statement::Insert(Row::new(id, username, email)))
}

// The sign is checked on the text so that negatives of any magnitude
// report `NegativeId` rather than overflowing.
fn parse_id(text: &str) -> Result<u32, PrepareError> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PrepareError::SyntaxError);
    }
    if negative && digits.bytes().any(|b| b != b'0') {
        return Err(PrepareError::NegativeId);
    }
    digits.parse().map_err(|_| PrepareError::SyntaxError)
}

fn check_text(field: &Field, text: &str) -> Result<(), PrepareError> {
    if text.len() > field.text_capacity() {
        return Err(PrepareError::StringTooLong {
            field: field.name,
            len: text.len(),
            max: field.text_capacity(),
        });
    }
    // An embedded NUL would be read back as the terminator.
    if text.contains('\0') {
        return Err(PrepareError::SyntaxError);
    }
    Ok(())
}

/// Splits a line the way `strtok` does: each token skips leading
/// delimiters, then runs up to and consumes a single delimiter.
struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn next_token(&mut self, delims: &str) -> Option<&'a str> {
        let start = self.rest.trim_start_matches(|c: char| delims.contains(c));
        if start.is_empty() {
            self.rest = start;
            return None;
        }
        match start.find(|c: char| delims.contains(c)) {
            Some(end) => {
                let delim_len = start[end..].chars().next().map_or(0, char::len_utf8);
                self.rest = &start[end + delim_len..];
                Some(&start[..end])
            }
            None => {
                self.rest = "";
                Some(start)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{COLUMN_EMAIL_SIZE, COLUMN_USERNAME_SIZE};

    fn insert(id: u32, username: &str, email: &str) -> Statement {
        Statement::Insert(Row::new(id, username, email))
    }

    #[test]
    fn parses_insert() {
        assert_eq!(
            Statement::prepare("insert 1 user1 person1@example.com"),
            Ok(insert(1, "user1", "person1@example.com"))
        );
    }

    #[test]
    fn parses_select() {
        assert_eq!(Statement::prepare("select"), Ok(Statement::Select));
        assert_eq!(Statement::prepare("select * from users"), Ok(Statement::Select));
        assert_eq!(Statement::prepare("select\r"), Ok(Statement::Select));
    }

    #[test]
    fn rejects_select_prefix_without_separator() {
        assert_eq!(
            Statement::prepare("selection"),
            Err(PrepareError::UnrecognizedStatement("selection".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_keywords() {
        for input in ["update 1 a b", "", "SELECT", " insert 1 a b"] {
            assert_eq!(
                Statement::prepare(input),
                Err(PrepareError::UnrecognizedStatement(input.to_string())),
                "{input:?}"
            );
        }
    }

    #[test]
    fn missing_fields_are_syntax_errors() {
        for input in ["insert", "insert 1", "insert 1 bob", "insert 1 bob "] {
            assert_eq!(Statement::prepare(input), Err(PrepareError::SyntaxError), "{input:?}");
        }
    }

    #[test]
    fn negative_id_is_rejected() {
        assert_eq!(
            Statement::prepare("insert -1 bob bob@x.com"),
            Err(PrepareError::NegativeId)
        );
    }

    #[test]
    fn negative_id_is_rejected_at_any_magnitude() {
        for input in [
            "insert -99999999999999999999 bob b@x.com",
            "insert -4294967296 bob b@x.com",
        ] {
            assert_eq!(Statement::prepare(input), Err(PrepareError::NegativeId), "{input:?}");
        }
        assert_eq!(
            Statement::prepare("insert -0 bob b@x.com"),
            Ok(insert(0, "bob", "b@x.com"))
        );
        assert_eq!(
            Statement::prepare("insert +5 bob b@x.com"),
            Ok(insert(5, "bob", "b@x.com"))
        );
    }

    #[test]
    fn non_numeric_or_out_of_range_id_is_a_syntax_error() {
        for input in [
            "insert abc bob bob@x.com",
            "insert 1x bob bob@x.com",
            "insert - bob bob@x.com",
            "insert --1 bob bob@x.com",
            "insert -1x bob bob@x.com",
            "insert 4294967296 bob bob@x.com",
            "insert 99999999999999999999 bob bob@x.com",
        ] {
            assert_eq!(Statement::prepare(input), Err(PrepareError::SyntaxError), "{input:?}");
        }
        assert_eq!(
            Statement::prepare("insert 4294967295 bob bob@x.com"),
            Ok(insert(u32::MAX, "bob", "bob@x.com"))
        );
    }

    #[test]
    fn username_length_is_bounded() {
        let name = "a".repeat(COLUMN_USERNAME_SIZE);
        assert_eq!(
            Statement::prepare(&format!("insert 1 {name} a@b.com")),
            Ok(insert(1, &name, "a@b.com"))
        );

        let long = "a".repeat(COLUMN_USERNAME_SIZE + 1);
        assert_eq!(
            Statement::prepare(&format!("insert 1 {long} a@b.com")),
            Err(PrepareError::StringTooLong {
                field: "username",
                len: COLUMN_USERNAME_SIZE + 1,
                max: COLUMN_USERNAME_SIZE,
            })
        );
    }

    #[test]
    fn email_length_is_bounded() {
        let long = "e".repeat(COLUMN_EMAIL_SIZE + 1);
        assert!(matches!(
            Statement::prepare(&format!("insert 1 bob {long}")),
            Err(PrepareError::StringTooLong { field: "email", .. })
        ));
    }

    #[test]
    fn email_keeps_embedded_spaces() {
        assert_eq!(
            Statement::prepare("insert 2 bob  bob at example dot com"),
            Ok(insert(2, "bob", " bob at example dot com"))
        );
    }

    #[test]
    fn repeated_spaces_before_username_are_skipped() {
        assert_eq!(
            Statement::prepare("insert   3   carol c@x.com"),
            Ok(insert(3, "carol", "c@x.com"))
        );
    }

    #[test]
    fn keyword_only_needs_to_be_a_prefix() {
        assert_eq!(
            Statement::prepare("insertx 4 dave d@x.com"),
            Ok(insert(4, "dave", "d@x.com"))
        );
    }

    #[test]
    fn embedded_nul_is_rejected() {
        assert_eq!(
            Statement::prepare("insert 1 bo\0b b@x.com"),
            Err(PrepareError::SyntaxError)
        );
    }
}
