//! The module contains the errors the engine can return.
//!
//! Three families exist:
//!
//! - backend failures: the request did not complete ([`Backend`]), the
//!   backend refused it ([`Rejected`]) or some records of a batch failed
//!   ([`BatchFailed`]);
//! - business rules checked before any backend call ([`BuiltInCategory`],
//!   [`KeyNotFound`], [`InvalidAmount`], [`InvalidName`]);
//! - malformed data coming back from the backend ([`Decode`]).
//!
//!  [`Backend`]: EngineError::Backend
//!  [`Rejected`]: EngineError::Rejected
//!  [`BatchFailed`]: EngineError::BatchFailed
//!  [`BuiltInCategory`]: EngineError::BuiltInCategory
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidName`]: EngineError::InvalidName
//!  [`Decode`]: EngineError::Decode
use std::fmt;

use api_types::ParseError;
use backend::BackendError;
use thiserror::Error;

/// Kind of backend call, used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("cannot {operation} built-in category \"{name}\"")]
    BuiltInCategory { operation: Operation, name: String },
    #[error("{operation} on {collection} rejected: {message}")]
    Rejected {
        operation: Operation,
        collection: &'static str,
        message: String,
    },
    #[error("failed to {operation} {failed} record(s) in {collection}")]
    BatchFailed {
        operation: Operation,
        collection: &'static str,
        failed: usize,
        message: Option<String>,
    },
    #[error("{operation} on {collection} returned no data")]
    NoData {
        operation: Operation,
        collection: &'static str,
    },
    #[error("invalid {collection} record: {source}")]
    Decode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("engine misconfigured: {0}")]
    Config(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
