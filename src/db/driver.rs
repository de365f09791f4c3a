//! Driver seam.
//!
//! The DB2 network driver is an external capability: it knows how to open
//! connections from a rendered connection string and run parameterized
//! queries against the wire protocol. This module pins down the contract
//! the adapter needs and nothing more, so any driver binding (or a scripted
//! test double) can sit behind it.

use crate::error::AdapterResult;
use crate::models::{Row, SqlValue};
use async_trait::async_trait;
use std::sync::Arc;

/// A live connection handle.
///
/// Driver errors must surface as `AdapterError::Database` with the SQLSTATE
/// preserved when one is available; the executor's recovery logic keys off
/// that field.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute a statement. `params` bind `?` placeholders in order; pass
    /// an empty slice for statements without placeholders.
    async fn query(&self, sql: &str, params: &[SqlValue]) -> AdapterResult<Vec<Row>>;

    /// Close the connection. Called once, from teardown.
    async fn close(&self);
}

/// A connection pool handle. Each operation acquires a pooled connection
/// per call, bounded by the pool's capacity.
#[async_trait]
pub trait Pool: Send + Sync {
    async fn acquire(&self) -> AdapterResult<Arc<dyn Connection>>;

    /// Close the pool and every handle it owns.
    async fn close(&self);
}

/// Entry point into the driver: opens single connections or pools from a
/// rendered connection string.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn open(&self, connection_string: &str) -> AdapterResult<Arc<dyn Connection>>;

    async fn pool(&self, connection_string: &str) -> AdapterResult<Arc<dyn Pool>>;
}
