//! Evaluator error type (`spec.md` §7).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("Name '{0}' is not defined.")]
    Name(String),

    #[error("{0}")]
    Type(String),

    #[error("{0} expects {1} argument(s), got {2}.")]
    Arity(String, usize, usize),
}

pub type EvalResult<T> = std::result::Result<T, EvalError>;
