//! graft-lex - lexical analysis for the Graft turtle language.
//!
//! Transforms a Graft program (UTF-8 text, no comments) into a flat
//! token stream per `spec.md` §4.1. Every character of input is
//! accounted for: either it is whitespace folded into a
//! `StatementSeparator`, part of a recognized token, or a [`LexError`].

mod cursor;
mod error;
mod lexer;
mod token;

pub use error::{LexError, LexResult};
pub use lexer::{lex, Lexer};
pub use token::{Op, Token, TokenKind};
