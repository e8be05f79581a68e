use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(docstore_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(docstore_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists: {}", .0.display())]
    #[diagnostic(
        code(docstore_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists(PathBuf),

    #[error("Invalid connection string: {0}")]
    #[diagnostic(
        code(docstore_config::invalid_uri),
        help("The URI must start with `mongodb://` or `mongodb+srv://`")
    )]
    InvalidUri(String),

    #[error("Invalid database name `{name}`: {reason}")]
    #[diagnostic(
        code(docstore_config::invalid_database_name),
        help("Database names are non-empty, shorter than 64 bytes and cannot contain /\\. \"$")
    )]
    InvalidDatabaseName { name: String, reason: &'static str },

    #[error("min_pool_size ({min}) is larger than max_pool_size ({max})")]
    #[diagnostic(
        code(docstore_config::invalid_pool_size),
        help("Lower min_pool_size or raise max_pool_size")
    )]
    InvalidPoolSize { min: u32, max: u32 },

    #[error("Invalid duration for `{field}`: {value}")]
    #[diagnostic(
        code(docstore_config::invalid_duration),
        help("Use a number followed by a unit, e.g. 500ms, 10s, 2m or 1h")
    )]
    InvalidDuration { field: &'static str, value: String },

    #[error("Invalid log level: {0}")]
    #[diagnostic(
        code(docstore_config::invalid_log_level),
        help("Valid levels are error, warn, info, debug and trace")
    )]
    InvalidLogLevel(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(docstore_config::io))]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(docstore_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(docstore_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
