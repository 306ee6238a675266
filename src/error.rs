//! Error types for itembin

use thiserror::Error;

/// Main error type for itembin operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No field with key {0} in record")]
    KeyNotPresent(u32),

    #[error("No record at index {0}")]
    NoSuchRecord(usize),

    #[error("No record selected")]
    NoSelection,
}

/// Result type alias for itembin operations
pub type Result<T> = std::result::Result<T, Error>;
