//! Error types for the docstore binary.

use docstore_config::error::ConfigError;
use docstore_db::DbError;
use miette::Diagnostic;
use mongodb::bson::extjson;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Db(#[from] DbError),

    #[error("Invalid JSON in {what}")]
    #[diagnostic(
        code(docstore::json),
        help("Quote keys and strings with double quotes, e.g. '{{\"name\": \"a\"}}'")
    )]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid extended JSON in {what}")]
    #[diagnostic(
        code(docstore::extjson),
        help("Check the $-prefixed type wrappers, e.g. {{\"$oid\": \"<24 hex chars>\"}}")
    )]
    ExtJson {
        what: &'static str,
        #[source]
        source: extjson::de::Error,
    },

    #[error("Expected {expected} for {what}, found {found}")]
    #[diagnostic(code(docstore::shape))]
    Shape {
        what: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Error while {action}")]
    #[diagnostic(code(docstore::io), help("Check file permissions and disk space"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install log subscriber")]
    #[diagnostic(code(docstore::logging))]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub type Result<T> = std::result::Result<T, CliError>;

pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            CliError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
