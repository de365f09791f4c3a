//! Connection configuration.
//!
//! A `ConnectionConfig` describes one logical database target. It is
//! immutable after registration; the registry keys entries by the config's
//! `identity`.

use serde::{Deserialize, Serialize};

/// Default DB2 port.
pub const DEFAULT_PORT: u16 = 50000;

/// Schema synchronization mode requested by the host.
///
/// Only create-if-missing behavior is implemented; the mode is carried so
/// the host's intent survives registration, but `Alter` and `Drop` do not
/// trigger any migration here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaSync {
    Safe,
    Alter,
    Drop,
}

impl Default for SchemaSync {
    fn default() -> Self {
        Self::Safe
    }
}

/// Configuration for a logical DB2 connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Logical connection name. Must be unique across the registry.
    pub identity: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: String,
    pub user: String,
    /// Contains sensitive data - never log
    #[serde(skip_serializing)]
    pub password: String,
    /// When true, operations acquire a pooled handle per call instead of
    /// sharing one cached singleton handle.
    #[serde(default)]
    pub pool: bool,
    #[serde(default)]
    pub schema_sync: SchemaSync,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl ConnectionConfig {
    /// Create a new connection configuration.
    pub fn new(
        identity: impl Into<String>,
        host: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            host: host.into(),
            port: DEFAULT_PORT,
            database: database.into(),
            user: user.into(),
            password: password.into(),
            pool: false,
            schema_sync: SchemaSync::Safe,
        }
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable pooled connections.
    pub fn with_pool(mut self, pool: bool) -> Self {
        self.pool = pool;
        self
    }

    /// Set the schema synchronization mode.
    pub fn with_schema_sync(mut self, schema_sync: SchemaSync) -> Self {
        self.schema_sync = schema_sync;
        self
    }

    /// Render the connection string in the exact KEY=VALUE format the DB2
    /// CLI driver expects. The key set and order must not change.
    pub fn connection_string(&self) -> String {
        format!(
            "DRIVER={{DB2}};DATABASE={};HOSTNAME={};UID={};PWD={};PORT={};PROTOCOL=TCPIP",
            self.database, self.host, self.user, self.password, self.port
        )
    }

    /// Get a display-safe version of the connection string (password masked).
    pub fn masked_connection_string(&self) -> String {
        format!(
            "DRIVER={{DB2}};DATABASE={};HOSTNAME={};UID={};PWD=****;PORT={};PROTOCOL=TCPIP",
            self.database, self.host, self.user, self.port
        )
    }
}
