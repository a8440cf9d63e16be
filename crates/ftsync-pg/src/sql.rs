//! SQL fragments for writing search vectors.
//!
//! A [`SearchVectorValue`] is never turned into a `tsvector` client-side.
//! It is bound as three parameters and converted by the server:
//!
//! ```sql
//! setweight(to_tsvector($1::regconfig, $2), $3::"char")
//! ```

use std::fmt;

use ftsync_core::SearchVectorValue;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

/// Number of bind parameters taken by [`to_tsvector_expr`].
pub const SEARCH_VECTOR_PARAMS: usize = 3;

/// Quote a PostgreSQL identifier, doubling embedded quotes.
pub fn quote_identifier(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// A table reference, optionally schema-qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    /// Schema, or the search path when `None`.
    pub schema: Option<String>,
    /// Table.
    pub name: String,
}

impl TableName {
    /// An unqualified table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// A schema-qualified table.
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Qualify with `schema` when one is given.
    pub fn in_schema(name: impl Into<String>, schema: Option<&str>) -> Self {
        Self {
            schema: schema.map(str::to_string),
            name: name.into(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", quote_identifier(schema))?;
        }
        f.write_str(&quote_identifier(&self.name))
    }
}

/// The conversion expression, with placeholders starting at `$first`.
pub fn to_tsvector_expr(first: usize) -> String {
    format!(
        "setweight(to_tsvector(${}::regconfig, ${}), ${}::\"char\")",
        first,
        first + 1,
        first + 2
    )
}

/// Bind a value's language, text, and weight, in placeholder order.
pub fn bind_search_vector<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &SearchVectorValue,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(value.language.as_str().to_string())
        .bind(value.text.clone())
        .bind(value.weight.as_char().to_string())
}

/// `UPDATE <table> SET "<column>" = <expr> WHERE "<key>" = $4`.
pub fn update_statement(table: &TableName, column: &str, key_column: &str) -> String {
    format!(
        "UPDATE {table} SET {} = {} WHERE {} = ${}",
        quote_identifier(column),
        to_tsvector_expr(1),
        quote_identifier(key_column),
        SEARCH_VECTOR_PARAMS + 1
    )
}

/// `SELECT "<column>" FROM <table> WHERE "<key>" = $1`.
pub fn select_statement(table: &TableName, column: &str, key_column: &str) -> String {
    format!(
        "SELECT {} FROM {table} WHERE {} = $1",
        quote_identifier(column),
        quote_identifier(key_column)
    )
}
