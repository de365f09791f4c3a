//! DB2 Adapter Library
//!
//! Translates schema-oriented collection operations (define/describe/drop,
//! find/create/update/destroy) into DB2-dialect SQL and manages connection
//! lifecycle. The underlying network driver is a pluggable capability
//! behind the [`db::Driver`] trait.

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use config::{ConnectionConfig, SchemaSync};
pub use db::{Connection, ConnectionRegistry, Db2Adapter, Driver, Pool};
pub use error::{AdapterError, AdapterResult};
pub use models::{AttributeSpec, AttributeType, Collection, QueryOptions, Row, SortDirection, SqlValue};
