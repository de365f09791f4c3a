//! Data models for the DB2 adapter.
//!
//! This module re-exports the schema and query option types that make up
//! the host-facing data contract.

pub mod attribute;
pub mod options;

pub use attribute::{AttributeSpec, AttributeType, Collection};
pub use options::{QueryOptions, Row, SortDirection, SqlValue};
