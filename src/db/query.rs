//! SQL rendering for the DB2 dialect.
//!
//! Every function here is pure: collection metadata and structured options
//! in, SQL text (and bound parameters, where the path binds) out. Two
//! binding models coexist on purpose. find/destroy bind `?` placeholders;
//! the FINAL TABLE statements (create/update) inline quoted literals, which
//! is how the dialect idiom retrieves written rows in one round trip. All
//! literal escaping goes through `SqlValue::to_literal`.
//!
//! Columns referenced by options but absent from the collection definition
//! are silently dropped, never an error.

use crate::error::{AdapterError, AdapterResult};
use crate::models::{AttributeSpec, AttributeType, Collection, QueryOptions, Row, SqlValue};
use std::collections::BTreeMap;
use tracing::warn;

use super::types::{abstract_type, native_type};

/// Default declared length for string columns.
const DEFAULT_STRING_LENGTH: u32 = 255;

/// Render the CREATE TABLE statement for a collection.
pub fn create_table(collection: &Collection) -> String {
    let columns: Vec<String> = collection
        .attributes
        .iter()
        .map(|(name, spec)| column_clause(name, spec))
        .collect();

    format!(
        "CREATE TABLE {} ({})",
        collection.table_name,
        columns.join(", ")
    )
}

/// Render one column clause of a CREATE TABLE statement.
fn column_clause(name: &str, spec: &AttributeSpec) -> String {
    if spec.primary_key && spec.auto_increment {
        // Identity column: the database assigns values on insert
        return format!(
            "{} INTEGER NOT NULL GENERATED ALWAYS AS IDENTITY (START WITH 1, INCREMENT BY 1) PRIMARY KEY",
            name
        );
    }
    if spec.primary_key {
        return format!("{} VARCHAR({}) NOT NULL PRIMARY KEY", name, DEFAULT_STRING_LENGTH);
    }
    match spec.attr_type {
        AttributeType::String => {
            let length = spec.length.unwrap_or(DEFAULT_STRING_LENGTH);
            format!("{} VARCHAR({})", name, length)
        }
        other => format!("{} {}", name, native_type(other)),
    }
}

/// Render the catalog query that describes a table's columns.
pub fn describe_table(table: &str) -> String {
    format!(
        "SELECT DISTINCT(NAME) AS NAME, COLTYPE, IDENTITY, KEYSEQ, NULLS \
         FROM SYSIBM.SYSCOLUMNS WHERE TBNAME = '{}'",
        table
    )
}

/// Render the DROP TABLE statement.
pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE {}", table)
}

/// Render a SELECT with bound parameters for the given options.
pub fn select(collection: &Collection, options: &QueryOptions) -> (String, Vec<SqlValue>) {
    let mut sql = format!(
        "SELECT {} FROM {}",
        collection.column_names().join(", "),
        collection.table_name
    );

    let (where_clause, params) = where_bound(collection, options);
    sql.push_str(&where_clause);
    sql.push_str(&order_by(collection, options));

    if let Some(limit) = options.limit {
        sql.push_str(&format!(" FETCH FIRST {} ROWS ONLY", limit));
    }

    (sql, params)
}

/// Render the single-round-trip insert: `SELECT .. FROM FINAL TABLE
/// (INSERT ..)`, returning the just-inserted row without a second query.
///
/// Values for columns not in the definition are excluded; the literal list
/// always matches the column list in arity. A values map with no column
/// left after that filter would render an empty column list, which is not
/// valid SQL, so it is rejected here instead of handed to the driver.
pub fn insert_returning(
    collection: &Collection,
    values: &BTreeMap<String, SqlValue>,
) -> AdapterResult<String> {
    let mut columns = Vec::new();
    let mut literals = Vec::new();
    for (column, value) in values {
        if !collection.has_column(column) {
            continue;
        }
        columns.push(column.as_str());
        literals.push(value.to_literal());
    }

    if columns.is_empty() {
        return Err(AdapterError::invalid_input(format!(
            "no value matches a column of collection '{}'",
            collection.name
        )));
    }

    Ok(format!(
        "SELECT {} FROM FINAL TABLE (INSERT INTO {} ({}) VALUES ({}))",
        collection.column_names().join(", "),
        collection.table_name,
        columns.join(", "),
        literals.join(", ")
    ))
}

/// Render the single-round-trip update: `SELECT .. FROM FINAL TABLE
/// (UPDATE ..)`.
///
/// Attributes flagged auto-increment never appear in the SET list; identity
/// columns are immutable. A values map that leaves no assignment after
/// filtering would render an empty SET list, which is not valid SQL, so it
/// is rejected here instead of handed to the driver.
pub fn update_returning(
    collection: &Collection,
    options: &QueryOptions,
    values: &BTreeMap<String, SqlValue>,
) -> AdapterResult<String> {
    let assignments: Vec<String> = values
        .iter()
        .filter(|(column, _)| {
            collection
                .attributes
                .get(*column)
                .is_some_and(|spec| !spec.auto_increment)
        })
        .map(|(column, value)| format!("{} = {}", column, value.to_literal()))
        .collect();

    if assignments.is_empty() {
        return Err(AdapterError::invalid_input(format!(
            "no value matches an assignable column of collection '{}'",
            collection.name
        )));
    }

    let mut inner = format!(
        "UPDATE {} SET {}",
        collection.table_name,
        assignments.join(", ")
    );
    inner.push_str(&where_inline(collection, options));

    Ok(format!(
        "SELECT {} FROM FINAL TABLE ({})",
        collection.column_names().join(", "),
        inner
    ))
}

/// Render a DELETE with bound parameters.
pub fn delete(collection: &Collection, options: &QueryOptions) -> (String, Vec<SqlValue>) {
    let mut sql = format!("DELETE FROM {}", collection.table_name);
    let (where_clause, params) = where_bound(collection, options);
    sql.push_str(&where_clause);
    (sql, params)
}

/// Build a ` WHERE ..` clause with `?` placeholders, plus its parameters.
/// Empty criteria produce an empty string.
fn where_bound(collection: &Collection, options: &QueryOptions) -> (String, Vec<SqlValue>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();
    for (column, value) in &options.criteria {
        if !collection.has_column(column) {
            continue;
        }
        conditions.push(format!("{} = ?", column));
        params.push(value.clone());
    }
    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

/// Build a ` WHERE ..` clause with inline literals (FINAL TABLE path).
fn where_inline(collection: &Collection, options: &QueryOptions) -> String {
    let conditions: Vec<String> = options
        .criteria
        .iter()
        .filter(|(column, _)| collection.has_column(column))
        .map(|(column, value)| format!("{} = {}", column, value.to_literal()))
        .collect();
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

/// Build an ` ORDER BY ..` clause. Empty sort produces an empty string.
fn order_by(collection: &Collection, options: &QueryOptions) -> String {
    let terms: Vec<String> = options
        .sort
        .iter()
        .filter(|(column, _)| collection.has_column(column))
        .map(|(column, direction)| format!("{} {}", column, direction.as_sql()))
        .collect();
    if terms.is_empty() {
        String::new()
    } else {
        format!(" ORDER BY {}", terms.join(", "))
    }
}

/// Reconstruct an attribute map from SYSIBM.SYSCOLUMNS rows.
///
/// Zero rows means the table does not exist, which is `None` rather than an
/// error. A column is inferred primary-key + auto-increment + unique
/// exactly when IDENTITY is 'Y', KEYSEQ is nonzero, NULLS is 'N', and the
/// mapped abstract type is integer.
pub fn attributes_from_catalog(rows: &[Row]) -> Option<BTreeMap<String, AttributeSpec>> {
    if rows.is_empty() {
        return None;
    }

    let mut attributes = BTreeMap::new();
    for row in rows {
        let Some(name) = field_str(row, "NAME") else {
            continue;
        };
        let coltype = field_str(row, "COLTYPE").unwrap_or_default();
        let Some(attr_type) = abstract_type(&coltype) else {
            warn!(column = %name, coltype = %coltype, "Unmapped native type in catalog row");
            continue;
        };

        let identity = field_str(row, "IDENTITY").as_deref() == Some("Y");
        let key_seq = field_i64(row, "KEYSEQ").unwrap_or(0);
        let not_null = field_str(row, "NULLS").as_deref() == Some("N");
        let is_identity_key =
            identity && key_seq != 0 && not_null && attr_type == AttributeType::Integer;

        let mut spec = AttributeSpec::new(attr_type);
        if is_identity_key {
            spec.primary_key = true;
            spec.auto_increment = true;
            spec.unique = true;
        }
        attributes.insert(name, spec);
    }

    Some(attributes)
}

fn field_str(row: &Row, key: &str) -> Option<String> {
    row.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
}

fn field_i64(row: &Row, key: &str) -> Option<i64> {
    let value = row.get(key)?;
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        // Some driver builds hand KEYSEQ back as a string
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
