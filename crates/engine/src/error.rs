//! The module contains the errors the engine can return.
//!
//! Session mutations never fail: invalid input is ignored or clamped at the
//! boundary. Errors only come out of the storage layer and out of parsing
//! user-typed amounts:
//!
//! - [`Io`] thrown when the backing file store cannot be read or written.
//! - [`Json`] thrown when a record cannot be (de)serialized.
//! - [`InvalidAmount`] thrown when a typed amount cannot be parsed.
//!
//!  [`Io`]: EngineError::Io
//!  [`Json`]: EngineError::Json
//!  [`InvalidAmount`]: EngineError::InvalidAmount
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidKey(a), Self::InvalidKey(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
