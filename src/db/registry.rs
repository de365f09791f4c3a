//! Connection registry.
//!
//! Maps a logical connection name to its configuration, collection
//! metadata, resolved accessor aliases, and at most one live handle. The
//! handle is opened lazily on first acquisition and cached for every later
//! operation on that name; only teardown closes it.
//!
//! Re-entrancy caveat: when no pool is configured, concurrent operations on
//! one logical connection share the cached handle without extra locking in
//! this layer. The driver is assumed to serialize query interleaving
//! internally. Pooled connections acquire a handle per call instead.

use crate::config::ConnectionConfig;
use crate::db::accessor::{AccessorTable, AccessorTarget};
use crate::db::driver::{Connection, Driver, Pool};
use crate::error::{AdapterError, AdapterResult};
use crate::models::Collection;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// A cached live handle: a singleton connection or a pool.
#[derive(Clone)]
enum Handle {
    Single(Arc<dyn Connection>),
    Pool(Arc<dyn Pool>),
}

impl Handle {
    async fn close(&self) {
        match self {
            Handle::Single(conn) => conn.close().await,
            Handle::Pool(pool) => pool.close().await,
        }
    }
}

/// One registered logical connection.
struct RegisteredConnection {
    config: ConnectionConfig,
    collections: HashMap<String, Collection>,
    accessors: AccessorTable,
    handle: Option<Handle>,
}

/// Registry of logical connections, shareable across tasks.
pub struct ConnectionRegistry {
    driver: Arc<dyn Driver>,
    entries: Arc<RwLock<HashMap<String, RegisteredConnection>>>,
}

impl ConnectionRegistry {
    /// Create a registry backed by the given driver.
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a connection with its collections.
    ///
    /// Rejects an empty identity and duplicates; the accessor alias table
    /// is resolved here, once, from the collections' primary keys.
    pub async fn register(
        &self,
        config: ConnectionConfig,
        collections: Vec<Collection>,
    ) -> AdapterResult<()> {
        if config.identity.is_empty() {
            return Err(AdapterError::MissingIdentity);
        }

        let mut entries = self.entries.write().await;
        if entries.contains_key(&config.identity) {
            return Err(AdapterError::duplicate_identity(&config.identity));
        }

        info!(
            connection = %config.identity,
            database = %config.database,
            pool = config.pool,
            collections = collections.len(),
            "Registering connection"
        );

        let accessors = AccessorTable::resolve(collections.iter());
        let collections = collections
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();

        entries.insert(
            config.identity.clone(),
            RegisteredConnection {
                config,
                collections,
                accessors,
                handle: None,
            },
        );
        Ok(())
    }

    /// Whether a connection is registered.
    pub async fn is_registered(&self, identity: &str) -> bool {
        self.entries.read().await.contains_key(identity)
    }

    /// Registered connection identities.
    pub async fn identities(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    /// Get a connection's configuration.
    pub async fn config(&self, identity: &str) -> AdapterResult<ConnectionConfig> {
        let entries = self.entries.read().await;
        entries
            .get(identity)
            .map(|entry| entry.config.clone())
            .ok_or_else(|| AdapterError::connection_not_found(identity))
    }

    /// Get a collection registered on a connection.
    pub async fn collection(&self, identity: &str, name: &str) -> AdapterResult<Collection> {
        let entries = self.entries.read().await;
        let entry = entries
            .get(identity)
            .ok_or_else(|| AdapterError::connection_not_found(identity))?;
        entry
            .collections
            .get(name)
            .cloned()
            .ok_or_else(|| AdapterError::collection_not_found(identity, name))
    }

    /// Resolve a primary-key accessor name on a connection,
    /// case-insensitively.
    pub async fn resolve_accessor(
        &self,
        identity: &str,
        accessor: &str,
    ) -> AdapterResult<Option<AccessorTarget>> {
        let entries = self.entries.read().await;
        let entry = entries
            .get(identity)
            .ok_or_else(|| AdapterError::connection_not_found(identity))?;
        Ok(entry.accessors.lookup(accessor).cloned())
    }

    /// Acquire a connection handle for one operation: open-or-reuse.
    ///
    /// The first acquisition opens the handle (a pool when the config asks
    /// for one) and caches it on the entry; later acquisitions reuse it.
    /// Pooled entries acquire a fresh pooled connection per call.
    pub async fn acquire(&self, identity: &str) -> AdapterResult<Arc<dyn Connection>> {
        // Fast path: handle already cached
        let cached = {
            let entries = self.entries.read().await;
            let entry = entries
                .get(identity)
                .ok_or_else(|| AdapterError::connection_not_found(identity))?;
            entry.handle.clone()
        };
        if let Some(handle) = cached {
            return self.connection_from(handle).await;
        }

        // Open outside the lock
        let config = self.config(identity).await?;
        let connection_string = config.connection_string();
        debug!(connection = %identity, "Opening connection handle");
        let opened = if config.pool {
            Handle::Pool(self.driver.pool(&connection_string).await?)
        } else {
            Handle::Single(self.driver.open(&connection_string).await?)
        };

        // Store it back, re-checking for a concurrent open or teardown.
        // A losing handle is closed outside the lock.
        let (handle, stale) = {
            let mut entries = self.entries.write().await;
            match entries.get_mut(identity) {
                None => (None, Some(opened)),
                Some(entry) => match &entry.handle {
                    Some(existing) => (Some(existing.clone()), Some(opened)),
                    None => {
                        entry.handle = Some(opened.clone());
                        (Some(opened), None)
                    }
                },
            }
        };

        if let Some(stale) = stale {
            stale.close().await;
        }
        match handle {
            Some(handle) => self.connection_from(handle).await,
            None => Err(AdapterError::connection_not_found(identity)),
        }
    }

    async fn connection_from(&self, handle: Handle) -> AdapterResult<Arc<dyn Connection>> {
        match handle {
            Handle::Single(conn) => Ok(conn),
            Handle::Pool(pool) => pool.acquire().await,
        }
    }

    /// Tear down one connection or, with `None`, every registered one.
    /// Closes live handles and removes the registry entries.
    pub async fn teardown(&self, identity: Option<&str>) -> AdapterResult<()> {
        let removed: Vec<(String, Option<Handle>)> = {
            let mut entries = self.entries.write().await;
            match identity {
                Some(identity) => match entries.remove(identity) {
                    Some(entry) => vec![(identity.to_string(), entry.handle)],
                    None => return Err(AdapterError::connection_not_found(identity)),
                },
                None => entries
                    .drain()
                    .map(|(identity, entry)| (identity, entry.handle))
                    .collect(),
            }
        };

        for (identity, handle) in removed {
            info!(connection = %identity, "Closing connection");
            if let Some(handle) = handle {
                handle.close().await;
            }
        }
        Ok(())
    }
}
