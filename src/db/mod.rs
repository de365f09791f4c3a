//! Database layer.
//!
//! This module holds the adapter core:
//! - Driver seam (the external DB2 client capability)
//! - Connection registry with cached live handles
//! - Pure SQL rendering for the DB2 dialect
//! - Type mapping between native and abstract attribute types
//! - Identity accessor aliases
//! - The operation executor tying it all together

pub mod accessor;
pub mod driver;
pub mod executor;
pub mod query;
pub mod registry;
pub mod types;

pub use accessor::{AccessorTable, AccessorTarget};
pub use driver::{Connection, Driver, Pool};
pub use executor::Db2Adapter;
pub use registry::ConnectionRegistry;
