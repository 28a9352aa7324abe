//! Parse error type.
//!
//! Message text follows the patterns enumerated in `spec.md` §4.2/§7
//! verbatim, since those patterns are part of the negative-test
//! contract (`spec.md` §8).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("Hit end of file - expected '{0}'")]
    UnterminatedBracket(char),

    #[error("You can't assign to anything except a symbol.")]
    NonSymbolAssignTarget,

    #[error("You can't modify ({0}) anything except a symbol.")]
    NonSymbolModifyTarget(String),

    #[error("Only symbols are allowed in function parameter lists. I found: {0}.")]
    NonSymbolParameter(String),

    #[error("':' must be followed by '(' in a function.")]
    ColonWithoutParamList,

    #[error(transparent)]
    Lex(#[from] graft_lex::LexError),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
