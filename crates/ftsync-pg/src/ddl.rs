//! Schema statements for search-vector columns.

use ftsync_core::{ClassMetadata, SearchVectorMapping};

use crate::sql::{TableName, quote_identifier};

/// Default given to NOT NULL columns so existing rows can be filled.
pub const EMPTY_TSVECTOR_DEFAULT: &str = "''::tsvector";

/// `"<column>" tsvector NULL`, or `NOT NULL DEFAULT ''::tsvector`.
pub fn column_definition(mapping: &SearchVectorMapping) -> String {
    let column = quote_identifier(&mapping.column_name);
    if mapping.nullable {
        format!("{column} tsvector NULL")
    } else {
        format!("{column} tsvector NOT NULL DEFAULT {EMPTY_TSVECTOR_DEFAULT}")
    }
}

/// Add the column if it is missing.
pub fn add_column_statement(table: &TableName, mapping: &SearchVectorMapping) -> String {
    format!(
        "ALTER TABLE {table} ADD COLUMN IF NOT EXISTS {}",
        column_definition(mapping)
    )
}

/// Name of the GIN index over a mapping's column.
pub fn gin_index_name(table: &TableName, mapping: &SearchVectorMapping) -> String {
    format!("{}_{}_gin", table.name, mapping.column_name)
}

/// Create a GIN index over the column if it is missing.
pub fn gin_index_statement(table: &TableName, mapping: &SearchVectorMapping) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {table} USING GIN ({})",
        quote_identifier(&gin_index_name(table, mapping)),
        quote_identifier(&mapping.column_name)
    )
}

/// Every statement needed for an entity's search vectors, columns first.
pub fn schema_statements(table: &TableName, metadata: &ClassMetadata) -> Vec<String> {
    let columns = metadata
        .mappings
        .iter()
        .map(|m| add_column_statement(table, m));
    let indexes = metadata
        .mappings
        .iter()
        .map(|m| gin_index_statement(table, m));
    columns.chain(indexes).collect()
}
