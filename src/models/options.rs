//! Query options and parameter values.
//!
//! `QueryOptions` is the structured where/sort/limit shape the host passes
//! to find/update/destroy. `SqlValue` is the parameter value enum, used
//! both for bound `?` placeholders and for the inline-literal paths of the
//! FINAL TABLE statements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// A result row as returned by the driver.
pub type Row = serde_json::Map<String, JsonValue>;

/// A parameter value for queries.
///
/// Deserialization is untagged and tries variants in declaration order, so
/// an incoming JSON string always becomes `String` — `Timestamp` is only
/// ever constructed in code, never from host-supplied JSON. A timestamp
/// serialized and read back comes back as its RFC 3339 string; its literal
/// rendering then passes through unchanged, which DB2 does not accept as a
/// timestamp. Hosts sending JSON must send timestamps pre-formatted in the
/// DB2 literal format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (stored as i64 for maximum range)
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Timestamp value, rendered in the DB2 literal format
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render this value as an inline SQL literal.
    ///
    /// This is the single escaping routine for the FINAL TABLE statement
    /// paths, which inline values instead of binding them. Non-null values
    /// become quoted string literals with embedded single quotes doubled;
    /// DB2 casts them to the column type on write.
    pub fn to_literal(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Bool(v) => {
                // DB2 has no boolean column type; the SMALLINT convention
                if *v { "'1'".to_string() } else { "'0'".to_string() }
            }
            Self::Int(v) => format!("'{}'", v),
            Self::Float(v) => format!("'{}'", v),
            Self::String(v) => format!("'{}'", v.replace('\'', "''")),
            Self::Timestamp(v) => format!("'{}'", v.format("%Y-%m-%d-%H.%M.%S%.6f")),
        }
    }

    /// Get the type name of this value for debugging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

/// Sort direction for ORDER BY clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Structured options for find/update/destroy.
///
/// Criteria are equality filters. Columns not present in the target
/// collection's attribute map are silently dropped when rendering SQL;
/// that tolerance is part of the contract, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryOptions {
    #[serde(default)]
    pub criteria: BTreeMap<String, SqlValue>,
    #[serde(default)]
    pub sort: BTreeMap<String, SortDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl QueryOptions {
    /// Create empty options (no WHERE, no ORDER BY, no limit).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality criterion.
    pub fn with_criterion(mut self, column: impl Into<String>, value: SqlValue) -> Self {
        self.criteria.insert(column.into(), value);
        self
    }

    /// Add a sort column.
    pub fn with_sort(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.insert(column.into(), direction);
        self
    }

    /// Set the row limit.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when no option would produce a SQL clause.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty() && self.sort.is_empty() && self.limit.is_none()
    }
}
