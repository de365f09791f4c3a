//! Collection and attribute definitions.
//!
//! A `Collection` is the abstract table-like entity supplied by the host at
//! registration time: a name, a table name, and a typed attribute map. The
//! adapter treats it as read-only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Abstract attribute kind. Each DB2 native column type maps to exactly one
/// of these; the reverse mapping picks one canonical native type per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Integer,
    Float,
    Text,
    Binary,
    Time,
    Date,
}

/// Definition of one attribute: its abstract type plus column flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub unique: bool,
    /// Declared length for string columns. Defaults to 255 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

impl AttributeSpec {
    /// Create a plain attribute of the given type.
    pub fn new(attr_type: AttributeType) -> Self {
        Self {
            attr_type,
            primary_key: false,
            auto_increment: false,
            unique: false,
            length: None,
        }
    }

    /// Create an auto-incrementing integer identity attribute.
    pub fn identity() -> Self {
        Self {
            attr_type: AttributeType::Integer,
            primary_key: true,
            auto_increment: true,
            unique: true,
            length: None,
        }
    }

    /// Mark this attribute as a primary key.
    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Mark this attribute as unique.
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Set the declared string length.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }
}

/// Abstract table-like entity with named, typed attributes.
///
/// The attribute map is ordered so that every rendered statement lists
/// columns deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub table_name: String,
    pub attributes: BTreeMap<String, AttributeSpec>,
}

impl Collection {
    /// Create a collection whose table name equals its name.
    pub fn new(name: impl Into<String>, attributes: BTreeMap<String, AttributeSpec>) -> Self {
        let name = name.into();
        Self {
            table_name: name.clone(),
            name,
            attributes,
        }
    }

    /// Set an explicit table name.
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Column names in definition order.
    pub fn column_names(&self) -> Vec<&str> {
        self.attributes.keys().map(String::as_str).collect()
    }

    /// The primary-key attribute, if the definition declares one.
    pub fn primary_key(&self) -> Option<(&str, &AttributeSpec)> {
        self.attributes
            .iter()
            .find(|(_, spec)| spec.primary_key)
            .map(|(name, spec)| (name.as_str(), spec))
    }

    /// Whether a column is part of the definition.
    pub fn has_column(&self, column: &str) -> bool {
        self.attributes.contains_key(column)
    }
}
