//! Error type for the byte-source adapters.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MftIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot map empty file: {0}")]
    EmptyFile(String),
}

pub type Result<T> = std::result::Result<T, MftIoError>;
