//! graft-par - recursive-descent parser for Graft.
//!
//! Token stream (`graft-lex`) → [`Ast`] tree, per `spec.md` §4.2.

mod ast;
mod error;
mod parser;

pub use ast::{Ast, Block};
pub use error::{ParseError, ParseResult};
pub use parser::{parse, Parser};
