//! Lexical error type.
//!
//! One variant per hard error named in `spec.md` §4.1/§7.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("Tab characters are not allowed (line {line}, column {column}).")]
    TabCharacter { line: u32, column: u32 },

    #[error("Unterminated string starting at line {line}, column {column}.")]
    UnterminatedString { line: u32, column: u32 },

    #[error("Unrecognized character '{ch}' (line {line}, column {column}).")]
    UnrecognizedCharacter { ch: char, line: u32, column: u32 },
}

pub type LexResult<T> = std::result::Result<T, LexError>;
