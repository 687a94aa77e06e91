use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised by core domain constructors.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing value: {0}")]
    Missing(&'static str),
}

pub type Result<T> = StdResult<T, CoreError>;
