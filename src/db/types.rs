//! Type mapping between DB2 native column types and abstract attribute
//! kinds.
//!
//! The native-to-abstract map is a fixed lookup table: every native type
//! name resolves to exactly one abstract kind. The abstract-to-native map
//! picks one canonical native type per kind, so round-tripping a native
//! type through the abstract kind is lossy (SMALLINT and BIGINT both come
//! back as INTEGER). That loss is accepted and covered by tests.

use crate::models::AttributeType;

/// Map a DB2 native type name to its abstract attribute kind.
///
/// The name is trimmed and upper-cased before lookup; catalog rows pad
/// `COLTYPE` with trailing blanks. Returns `None` for unknown types.
pub fn abstract_type(native: &str) -> Option<AttributeType> {
    let normalized = native.trim().to_uppercase();
    let kind = match normalized.as_str() {
        "TIME" | "TIMESTAMP" | "TIMESTMP" => AttributeType::Time,
        "DATE" => AttributeType::Date,
        "BLOB" | "BINARY" | "VARBINARY" | "GRAPHIC" | "VARGRAPHIC" => AttributeType::Binary,
        "CHAR" | "CHARACTER" | "VARCHAR" => AttributeType::String,
        "SMALLINT" | "INTEGER" | "INT" | "BIGINT" => AttributeType::Integer,
        "DECIMAL" | "NUMERIC" | "REAL" | "FLOAT" | "DOUBLE" => AttributeType::Float,
        "CLOB" | "DBCLOB" | "LONG VARCHAR" | "XML" => AttributeType::Text,
        _ => return None,
    };
    Some(kind)
}

/// Map an abstract attribute kind to its canonical DB2 native type.
pub fn native_type(kind: AttributeType) -> &'static str {
    match kind {
        AttributeType::String => "VARCHAR",
        AttributeType::Integer => "INTEGER",
        AttributeType::Float => "DOUBLE",
        AttributeType::Text => "CLOB",
        AttributeType::Binary => "BLOB",
        AttributeType::Time => "TIMESTAMP",
        AttributeType::Date => "DATE",
    }
}
