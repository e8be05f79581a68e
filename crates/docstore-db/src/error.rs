//! Error types for docstore-db.
//!
//! Driver failures are wrapped transparently: the message and source chain
//! are exactly those of the driver error.

use docstore_config::error::ConfigError;
use miette::Diagnostic;
use mongodb::bson::oid;
use thiserror::Error;

/// Database error type for docstore-db operations.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error(transparent)]
    #[diagnostic(
        code(docstore_db::driver),
        help("Check that the server is reachable and the request is valid")
    )]
    Driver(#[from] mongodb::error::Error),

    #[error(transparent)]
    #[diagnostic(
        code(docstore_db::invalid_id),
        help("Identifiers are 24-character hexadecimal ObjectId strings")
    )]
    InvalidId(#[from] oid::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

impl DbError {
    /// Returns the driver error, if this error came from the driver.
    pub fn as_driver(&self) -> Option<&mongodb::error::Error> {
        match self {
            DbError::Driver(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for docstore-db operations.
pub type Result<T> = std::result::Result<T, DbError>;
