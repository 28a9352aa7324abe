//! Error handling for the `graft` CLI.

use thiserror::Error;

/// Top-level error type for the `graft` CLI.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not read program from {0}: {1}")]
    ProgramRead(String, std::io::Error),

    #[error("{0}")]
    Parse(#[from] graft_par::ParseError),

    #[error("{0}")]
    Eval(#[from] graft_eval::EvalError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
