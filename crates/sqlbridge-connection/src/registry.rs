use crate::dialect::Dialect;
use crate::error::{DataError, Result};
use crate::traits::SqlConnection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Connection configuration for creating backends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Backend type identifier (duckdb, datafusion, snowflake, etc.)
    pub backend: String,
    /// Host or connection endpoint
    #[serde(default)]
    pub host: Option<String>,
    /// Port number
    #[serde(default)]
    pub port: Option<u16>,
    /// Username or access key
    #[serde(default)]
    pub username: Option<String>,
    /// Password or secret key
    #[serde(default)]
    pub password: Option<String>,
    /// Database name, file path or catalog
    #[serde(default)]
    pub database: Option<String>,
    /// Additional backend-specific options
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl ConnectionConfig {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            ..Default::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Look up a backend-specific option
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Get connection string for display purposes (without password)
    pub fn connection_string(&self) -> String {
        let mut parts = vec![format!("{}://", self.backend)];

        if let Some(username) = &self.username {
            parts.push(format!("{}@", username));
        }

        if let Some(host) = &self.host {
            parts.push(host.clone());

            if let Some(port) = self.port {
                parts.push(format!(":{}", port));
            }
        }

        if let Some(database) = &self.database {
            parts.push(format!("/{}", database));
        }

        parts.join("")
    }
}

/// Factory trait for creating connections of one backend type
pub trait ConnectionFactory: Send + Sync {
    /// Get the backend type this factory handles
    fn backend_type(&self) -> &'static str;

    /// Dialect of the connections this factory creates, known before any connection exists
    fn dialect(&self) -> Dialect;

    /// Create a connection from configuration
    fn create_connection(&self, config: ConnectionConfig) -> Result<Arc<dyn SqlConnection>>;
}

/// Registry of backend factories, keyed by backend type
pub struct ConnectionRegistry {
    factories: Arc<RwLock<HashMap<String, Arc<dyn ConnectionFactory>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a factory for a backend type
    pub async fn register_factory(&self, factory: Arc<dyn ConnectionFactory>) {
        let backend = factory.backend_type();
        let mut factories = self.factories.write().await;

        if factories.contains_key(backend) {
            warn!("Overwriting existing factory for backend: {}", backend);
        }

        factories.insert(backend.to_string(), factory);
        debug!("Registered factory for backend: {}", backend);
    }

    async fn factory(&self, backend: &str) -> Result<Arc<dyn ConnectionFactory>> {
        let factories = self.factories.read().await;
        factories.get(backend).cloned().ok_or_else(|| {
            DataError::invalid_configuration(format!(
                "No factory registered for backend: {}",
                backend
            ))
        })
    }

    /// Create a new connection. The registry does not keep it; the caller owns its lifetime.
    pub async fn connect(&self, config: ConnectionConfig) -> Result<Arc<dyn SqlConnection>> {
        let factory = self.factory(&config.backend).await?;

        debug!("Creating connection: {}", config.connection_string());

        let connection = factory.create_connection(config)?;

        let factory_dialect = factory.dialect();
        if connection.dialect() != factory_dialect {
            warn!(
                "Backend {} created a {} connection but advertises dialect {}",
                factory.backend_type(),
                connection.dialect(),
                factory_dialect
            );
        }

        Ok(connection)
    }

    /// Resolve the dialect of a backend type without connecting
    pub async fn dialect_for(&self, backend: &str) -> Result<Dialect> {
        Ok(self.factory(backend).await?.dialect())
    }

    /// List registered backend types, sorted
    pub async fn list_backends(&self) -> Vec<String> {
        let factories = self.factories.read().await;
        let mut backends: Vec<String> = factories.keys().cloned().collect();
        backends.sort();
        backends
    }

    /// Check if a backend is registered
    pub async fn has_backend(&self, backend: &str) -> bool {
        let factories = self.factories.read().await;
        factories.contains_key(backend)
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
