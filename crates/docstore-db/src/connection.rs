//! Database connection management.
//!
//! [`DbConnection`] owns a driver [`Client`] and the [`Database`] selected by
//! configuration, and hands out repositories bound to them.

use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use tracing::{debug, info};

use docstore_config::config::DatabaseConfig;

use crate::{
    entity::{Entity, Schema},
    error::Result,
    repository::Repository,
};

/// Client and database handle pair.
///
/// The driver connects lazily and pools connections itself, so creating a
/// `DbConnection` performs no I/O beyond resolving the connection string.
#[derive(Clone, Debug)]
pub struct DbConnection {
    client: Client,
    database: Database,
}

impl DbConnection {
    /// Builds a client from `config` and selects the configured database.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if the connection string cannot be parsed,
    /// or a config error if a timeout is malformed.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(config.uri.as_str()).await?;

        if let Some(app_name) = &config.app_name {
            options.app_name = Some(app_name.clone());
        }
        if let Some(min) = config.min_pool_size {
            options.min_pool_size = Some(min);
        }
        if let Some(max) = config.max_pool_size {
            options.max_pool_size = Some(max);
        }
        if let Some(timeout) = config.connect_timeout()? {
            options.connect_timeout = Some(timeout);
        }
        if let Some(timeout) = config.server_selection_timeout()? {
            options.server_selection_timeout = Some(timeout);
        }

        let client = Client::with_options(options)?;
        info!("Using database '{}'", config.name);

        Ok(Self::from_client(client, &config.name))
    }

    /// Wraps an existing client.
    pub fn from_client(client: Client, database: &str) -> Self {
        let database = client.database(database);
        Self { client, database }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Round-trips a `ping` command to the server.
    pub async fn ping(&self) -> Result<()> {
        debug!("Pinging database '{}'", self.database.name());
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Repository for a schema type, bound to its declared collection.
    pub fn repository<T: Schema>(&self) -> Repository<T> {
        self.repository_for(T::COLLECTION)
    }

    /// Repository for any entity type over the named collection.
    pub fn repository_for<T: Entity>(&self, collection: &str) -> Repository<T> {
        Repository::new(self.database.collection(collection), self.client.clone())
    }
}

impl std::ops::Deref for DbConnection {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.database
    }
}

#[cfg(test)]
mod tests {
    use docstore_config::config::Config;
    use mongodb::bson::{oid::ObjectId, Document};
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::{define_schema, error::DbError};

    #[derive(Debug, Serialize, Deserialize)]
    struct Order {
        #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
        id: Option<ObjectId>,
        total: i64,
    }

    define_schema!(Order => "orders");

    #[tokio::test]
    async fn test_connect_applies_database_name() {
        let config = Config::default_config();

        let conn = DbConnection::connect(&config.database).await.unwrap();

        assert_eq!(conn.database().name(), config.database.name);
        assert_eq!(conn.name(), config.database.name);
    }

    #[tokio::test]
    async fn test_connect_rejects_unparseable_uri() {
        let config = DatabaseConfig {
            uri: "mongodb://".to_string(),
            ..DatabaseConfig::default()
        };

        let result = DbConnection::connect(&config).await;

        assert!(matches!(result, Err(DbError::Driver(_))));
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_timeout() {
        let config = DatabaseConfig {
            connect_timeout: Some("later".to_string()),
            ..DatabaseConfig::default()
        };

        let result = DbConnection::connect(&config).await;

        assert!(matches!(result, Err(DbError::Config(_))));
    }

    #[tokio::test]
    async fn test_repositories_are_bound_to_collections() {
        let conn = DbConnection::connect(&DatabaseConfig::default())
            .await
            .unwrap();

        let orders = conn.repository::<Order>();
        let raw = conn.repository_for::<Document>("events");

        assert_eq!(orders.name(), "orders");
        assert_eq!(raw.name(), "events");
        assert_eq!(orders.namespace().db, conn.name());
    }
}
