//! Operation executor.
//!
//! `Db2Adapter` is the public surface: every operation resolves the
//! registered connection, acquires a handle (open-or-reuse), renders SQL
//! through the query builder, and executes it through the driver seam.
//!
//! Error recovery is deliberately narrow. `define` swallows
//! "table already exists" and `drop` swallows "table not found", both
//! returning empty rows so repeated schema calls are idempotent. Every
//! other driver error propagates to the caller unchanged, never retried.

use crate::config::ConnectionConfig;
use crate::db::driver::Driver;
use crate::db::query;
use crate::db::registry::ConnectionRegistry;
use crate::error::{AdapterError, AdapterResult};
use crate::models::{AttributeSpec, Collection, QueryOptions, Row, SqlValue};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// The adapter: a registry plus a driver, exposing the schema and data
/// operations.
///
/// Each adapter owns its own registry, so one process can run several
/// independent adapters with deterministic teardown.
pub struct Db2Adapter {
    registry: Arc<ConnectionRegistry>,
}

impl Db2Adapter {
    /// Create an adapter backed by the given driver.
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new(driver)),
        }
    }

    /// The adapter's connection registry.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Register a connection and its collections.
    pub async fn register_connection(
        &self,
        config: ConnectionConfig,
        collections: Vec<Collection>,
    ) -> AdapterResult<()> {
        self.registry.register(config, collections).await
    }

    /// Close one connection, or all of them with `None`, removing the
    /// registry entries.
    pub async fn teardown(&self, identity: Option<&str>) -> AdapterResult<()> {
        self.registry.teardown(identity).await
    }

    /// Create the collection's table. Idempotent: an existing table is
    /// success with empty rows.
    pub async fn define(
        &self,
        identity: &str,
        collection_name: &str,
        definition: BTreeMap<String, AttributeSpec>,
    ) -> AdapterResult<Vec<Row>> {
        let collection = self.collection_for(identity, collection_name, definition).await?;
        let sql = query::create_table(&collection);

        let connection = self.registry.acquire(identity).await?;
        debug!(connection = %identity, table = %collection.table_name, sql = %sql, "define");
        match connection.query(&sql, &[]).await {
            Ok(rows) => Ok(rows),
            Err(err) if err.is_table_exists() => {
                info!(connection = %identity, table = %collection.table_name, "Table already exists");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Introspect a collection's table from the system catalog.
    ///
    /// Returns `None` when the table does not exist; that is not an error.
    pub async fn describe(
        &self,
        identity: &str,
        collection_name: &str,
    ) -> AdapterResult<Option<BTreeMap<String, AttributeSpec>>> {
        let table = self.table_name(identity, collection_name).await?;
        let sql = query::describe_table(&table);

        let connection = self.registry.acquire(identity).await?;
        debug!(connection = %identity, table = %table, sql = %sql, "describe");
        let rows = connection.query(&sql, &[]).await?;
        Ok(query::attributes_from_catalog(&rows))
    }

    /// Drop the collection's table, after dropping each related table in
    /// order. Idempotent: a missing table is success with empty rows. The
    /// first unrecoverable failure aborts the sequence; tables already
    /// dropped stay dropped.
    pub async fn drop(
        &self,
        identity: &str,
        collection_name: &str,
        relations: &[String],
    ) -> AdapterResult<Vec<Row>> {
        let table = self.table_name(identity, collection_name).await?;
        let connection = self.registry.acquire(identity).await?;

        for relation in relations {
            let relation_table = self.table_name(identity, relation).await?;
            self.drop_one(identity, &connection, &relation_table).await?;
        }
        self.drop_one(identity, &connection, &table).await
    }

    async fn drop_one(
        &self,
        identity: &str,
        connection: &Arc<dyn crate::db::driver::Connection>,
        table: &str,
    ) -> AdapterResult<Vec<Row>> {
        let sql = query::drop_table(table);
        debug!(connection = %identity, table = %table, sql = %sql, "drop");
        match connection.query(&sql, &[]).await {
            Ok(rows) => Ok(rows),
            Err(err) if err.is_table_missing() => {
                info!(connection = %identity, table = %table, "Table not found, nothing to drop");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Select rows matching the options.
    pub async fn find(
        &self,
        identity: &str,
        collection_name: &str,
        options: &QueryOptions,
    ) -> AdapterResult<Vec<Row>> {
        let collection = self.registry.collection(identity, collection_name).await?;
        let (sql, params) = query::select(&collection, options);

        let connection = self.registry.acquire(identity).await?;
        debug!(connection = %identity, table = %collection.table_name, sql = %sql, "find");
        connection.query(&sql, &params).await
    }

    /// Insert one row and return it, in a single round trip via the
    /// FINAL TABLE idiom.
    pub async fn create(
        &self,
        identity: &str,
        collection_name: &str,
        values: &BTreeMap<String, SqlValue>,
    ) -> AdapterResult<Row> {
        let collection = self.registry.collection(identity, collection_name).await?;
        let sql = query::insert_returning(&collection, values)?;

        let connection = self.registry.acquire(identity).await?;
        debug!(connection = %identity, table = %collection.table_name, sql = %sql, "create");
        let mut rows = connection.query(&sql, &[]).await?;
        if rows.is_empty() {
            return Err(AdapterError::internal("insert returned no row"));
        }
        Ok(rows.swap_remove(0))
    }

    /// Update matching rows and return them, in a single round trip via
    /// the FINAL TABLE idiom. Identity columns are never assigned.
    pub async fn update(
        &self,
        identity: &str,
        collection_name: &str,
        options: &QueryOptions,
        values: &BTreeMap<String, SqlValue>,
    ) -> AdapterResult<Vec<Row>> {
        let collection = self.registry.collection(identity, collection_name).await?;
        let sql = query::update_returning(&collection, options, values)?;

        let connection = self.registry.acquire(identity).await?;
        debug!(connection = %identity, table = %collection.table_name, sql = %sql, "update");
        connection.query(&sql, &[]).await
    }

    /// Delete matching rows.
    pub async fn destroy(
        &self,
        identity: &str,
        collection_name: &str,
        options: &QueryOptions,
    ) -> AdapterResult<Vec<Row>> {
        let collection = self.registry.collection(identity, collection_name).await?;
        let (sql, params) = query::delete(&collection, options);

        let connection = self.registry.acquire(identity).await?;
        debug!(connection = %identity, table = %collection.table_name, sql = %sql, "destroy");
        connection.query(&sql, &params).await
    }

    /// Raw passthrough for callers needing direct dialect access.
    pub async fn query(
        &self,
        identity: &str,
        collection_name: &str,
        sql: &str,
        params: &[SqlValue],
    ) -> AdapterResult<Vec<Row>> {
        let connection = self.registry.acquire(identity).await?;
        debug!(connection = %identity, collection = %collection_name, sql = %sql, "raw query");
        connection.query(sql, params).await
    }

    /// The table name for a collection: the registered mapping when one
    /// exists, otherwise the collection name itself (schema operations may
    /// target collections defined at runtime).
    async fn table_name(&self, identity: &str, collection_name: &str) -> AdapterResult<String> {
        match self.registry.collection(identity, collection_name).await {
            Ok(collection) => Ok(collection.table_name),
            Err(AdapterError::CollectionNotFound { .. }) => Ok(collection_name.to_string()),
            Err(err) => Err(err),
        }
    }

    async fn collection_for(
        &self,
        identity: &str,
        collection_name: &str,
        definition: BTreeMap<String, AttributeSpec>,
    ) -> AdapterResult<Collection> {
        let table_name = self.table_name(identity, collection_name).await?;
        Ok(Collection::new(collection_name, definition).with_table_name(table_name))
    }
}
