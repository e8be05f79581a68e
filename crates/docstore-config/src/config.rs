use std::{
    fs,
    path::PathBuf,
    sync::{LazyLock, RwLock},
    time::Duration,
};

use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::{debug, info};

use crate::{
    annotations::annotate_toml_table,
    error::{ConfigError, Result},
    utils::{parse_duration, xdg_config_home},
};

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "docstore";
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Application's configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Connection settings for the document database.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings used by the command line interface.
    #[serde(default)]
    pub log: LogConfig,
}

/// Connection settings for the document database.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Documented, DocumentedFields)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string, `mongodb://` or `mongodb+srv://`.
    /// Overridden by DOCSTORE_URI.
    /// Default: mongodb://localhost:27017
    pub uri: String,

    /// Database that every repository is bound to.
    /// Overridden by DOCSTORE_DATABASE.
    /// Default: docstore
    pub name: String,

    /// Application name reported to the server.
    pub app_name: Option<String>,

    /// Minimum number of pooled connections per server.
    pub min_pool_size: Option<u32>,

    /// Maximum number of pooled connections per server.
    /// Default: driver default (10)
    pub max_pool_size: Option<u32>,

    /// Timeout for establishing a connection, e.g. "10s".
    pub connect_timeout: Option<String>,

    /// Timeout for selecting a server before an operation fails, e.g. "30s".
    pub server_selection_timeout: Option<String>,
}

/// Logging settings used by the command line interface.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct LogConfig {
    /// One of error, warn, info, debug, trace.
    /// Default: info
    pub level: Option<String>,

    /// Emit log events as JSON lines.
    /// Default: false
    pub json: Option<bool>,
}

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("DOCSTORE_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("docstore").join("config.toml"),
    })
});

/// Returns the path the configuration is read from and written to.
pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .map(|path| path.clone())
        .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
}

/// Points subsequent loads and writes at `path`.
pub fn set_config_path(path: PathBuf) {
    let mut guard = CONFIG_PATH
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = path;
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            name: DEFAULT_DATABASE.to_string(),
            app_name: None,
            min_pool_size: None,
            max_pool_size: None,
            connect_timeout: None,
            server_selection_timeout: None,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Result<Option<Duration>> {
        parse_optional_duration("connect_timeout", self.connect_timeout.as_deref())
    }

    pub fn server_selection_timeout(&self) -> Result<Option<Duration>> {
        parse_optional_duration(
            "server_selection_timeout",
            self.server_selection_timeout.as_deref(),
        )
    }

    fn validate(&self) -> Result<()> {
        if !(self.uri.starts_with("mongodb://") || self.uri.starts_with("mongodb+srv://")) {
            return Err(ConfigError::InvalidUri(self.uri.clone()));
        }

        validate_database_name(&self.name)?;

        if let (Some(min), Some(max)) = (self.min_pool_size, self.max_pool_size) {
            if min > max {
                return Err(ConfigError::InvalidPoolSize { min, max });
            }
        }

        self.connect_timeout()?;
        self.server_selection_timeout()?;

        Ok(())
    }
}

impl LogConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn json(&self) -> bool {
        self.json.unwrap_or(false)
    }
}

fn parse_optional_duration(field: &'static str, value: Option<&str>) -> Result<Option<Duration>> {
    value
        .map(|v| {
            parse_duration(v).ok_or_else(|| ConfigError::InvalidDuration {
                field,
                value: v.to_string(),
            })
        })
        .transpose()
}

fn validate_database_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.len() >= 64 {
        Some("name must be shorter than 64 bytes")
    } else if name
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '.' | ' ' | '"' | '$' | '\0'))
    {
        Some("name contains a forbidden character")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidDatabaseName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

impl Config {
    /// Loads the configuration file, applies environment overrides and
    /// validates the result. A missing file yields the default configuration.
    pub fn new() -> Result<Self> {
        let path = config_path();

        let mut config = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.apply_env_overrides();
        config.resolve()?;

        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(uri) = std::env::var("DOCSTORE_URI") {
            self.database.uri = uri;
        }
        if let Ok(name) = std::env::var("DOCSTORE_DATABASE") {
            self.database.name = name;
        }
    }

    /// Fills in defaults and validates every section.
    pub fn resolve(&mut self) -> Result<()> {
        self.database.validate()?;

        let level = self
            .log
            .level
            .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(level.clone()));
        }
        self.log.json.get_or_insert(false);

        Ok(())
    }

    /// The configuration written by `defconfig`: every optional field filled in.
    pub fn default_config() -> Self {
        Self {
            database: DatabaseConfig {
                app_name: Some("docstore".to_string()),
                min_pool_size: Some(0),
                max_pool_size: Some(10),
                connect_timeout: Some("10s".to_string()),
                server_selection_timeout: Some("30s".to_string()),
                ..DatabaseConfig::default()
            },
            log: LogConfig {
                level: Some(DEFAULT_LOG_LEVEL.to_string()),
                json: Some(false),
            },
        }
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;

        if let Some(table) = doc.get_mut("database").and_then(|item| item.as_table_mut()) {
            annotate_toml_table::<DatabaseConfig>(table, true)?;
        }
        if let Some(table) = doc.get_mut("log").and_then(|item| item.as_table_mut()) {
            annotate_toml_table::<LogConfig>(table, true)?;
        }

        Ok(doc)
    }
}

/// Writes the documented default configuration to [`config_path`].
pub fn generate_default_config() -> Result<PathBuf> {
    let path = config_path();

    if path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(path));
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        path.display()
    );
    Ok(path)
}
