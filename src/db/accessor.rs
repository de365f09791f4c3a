//! Identity-column accessor aliases.
//!
//! Hosts generate a "find by primary key" accessor per collection, and DB2
//! conventionally reports identity columns in uppercase, so the same
//! accessor is reachable under both casings. Rather than generating names
//! dynamically, the registry resolves an alias table once at registration
//! and lookups are case-insensitive from then on.

use crate::models::Collection;
use std::collections::HashMap;

/// Alias table mapping accessor names to `(collection, column)` targets.
#[derive(Debug, Default)]
pub struct AccessorTable {
    /// Keyed by lower-cased accessor name.
    aliases: HashMap<String, AccessorTarget>,
}

/// What an accessor resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorTarget {
    pub collection: String,
    pub column: String,
}

impl AccessorTable {
    /// Build the alias table for a set of collections. Collections without
    /// a primary-key attribute contribute no aliases.
    pub fn resolve<'a>(collections: impl IntoIterator<Item = &'a Collection>) -> Self {
        let mut table = Self::default();
        for collection in collections {
            if let Some((column, _)) = collection.primary_key() {
                table.insert(collection, column);
            }
        }
        table
    }

    fn insert(&mut self, collection: &Collection, column: &str) {
        let target = AccessorTarget {
            collection: collection.name.clone(),
            column: column.to_string(),
        };
        // Natural casing and the uppercase identity-column casing both map
        // to the same target; keys are lower-cased so lookup is
        // case-insensitive
        for name in [
            format!("find_by_{}", column),
            format!("find_by_{}", column.to_uppercase()),
        ] {
            self.aliases.insert(name.to_lowercase(), target.clone());
        }
    }

    /// Resolve an accessor name, case-insensitively.
    pub fn lookup(&self, accessor: &str) -> Option<&AccessorTarget> {
        self.aliases.get(&accessor.to_lowercase())
    }

    /// Number of distinct alias entries.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
