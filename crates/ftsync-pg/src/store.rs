//! Reading and writing search-vector columns.
//!
//! [`SearchVectorStore`] wraps a connection pool. It writes computed
//! [`SearchVectorValue`]s through `to_tsvector`, reads columns back as
//! [`TsVector`]s, and creates missing columns and indexes.
//!
//! ```rust,ignore
//! use ftsync_core::{MappingConfig, MetadataLoader};
//! use ftsync_pg::{SearchVectorStore, TableName};
//!
//! let config = MappingConfig::load("ftsync.toml")?;
//! let store = SearchVectorStore::connect(&config.database).await?;
//!
//! let metadata = MetadataLoader::load(&Article::schema())?;
//! let table = store.table("articles");
//! store.ensure_schema(&table, &metadata).await?;
//! store.write_entity(&table, "id", article.id, &metadata, &article).await?;
//! ```

use ftsync_core::{
    ClassMetadata, DatabaseConfig, SearchVectorMapping, SearchVectorValue, Searchable,
    compute_search_vector,
};
use sqlx::postgres::{PgPool, PgPoolOptions, Postgres};
use sqlx::{Encode, Type};

use crate::ddl::schema_statements;
use crate::error::Result;
use crate::sql::{TableName, bind_search_vector, select_statement, update_statement};
use crate::tsvector::TsVector;

/// PostgreSQL access for search-vector columns.
#[derive(Debug, Clone)]
pub struct SearchVectorStore {
    pool: PgPool,
    schema: Option<String>,
}

impl SearchVectorStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool, schema: None }
    }

    /// Connect using the `[database]` section of a mapping file.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config.resolved_url()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&url)
            .await?;
        log::info!(
            "Connected to PostgreSQL (max {} connections)",
            config.max_connections
        );
        Ok(Self {
            pool,
            schema: config.schema.clone(),
        })
    }

    /// Qualify table names with `schema` from now on.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// A table reference in this store's schema.
    pub fn table(&self, name: &str) -> TableName {
        TableName::in_schema(name, self.schema.as_deref())
    }

    /// Write one value into one row. Returns the rows affected.
    pub async fn write<K>(
        &self,
        table: &TableName,
        key_column: &str,
        key: K,
        mapping: &SearchVectorMapping,
        value: &SearchVectorValue,
    ) -> Result<u64>
    where
        K: for<'q> Encode<'q, Postgres> + Type<Postgres> + Send + 'static,
    {
        let sql = update_statement(table, &mapping.column_name, key_column);
        log::debug!("{sql}");
        let result = bind_search_vector(sqlx::query(&sql), value)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Recompute and write every search vector of `entity` in one transaction.
    ///
    /// Returns the rows affected, summed over all mappings.
    pub async fn write_entity<E, K>(
        &self,
        table: &TableName,
        key_column: &str,
        key: K,
        metadata: &ClassMetadata,
        entity: &E,
    ) -> Result<u64>
    where
        E: Searchable,
        K: for<'q> Encode<'q, Postgres> + Type<Postgres> + Clone + Send + 'static,
    {
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;

        for mapping in &metadata.mappings {
            let value = compute_search_vector(mapping, entity);
            let sql = update_statement(table, &mapping.column_name, key_column);
            log::debug!("{sql}");
            affected += bind_search_vector(sqlx::query(&sql), &value)
                .bind(key.clone())
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        Ok(affected)
    }

    /// Read a column back. `None` when the row is missing or the column is NULL.
    pub async fn read<K>(
        &self,
        table: &TableName,
        key_column: &str,
        key: K,
        mapping: &SearchVectorMapping,
    ) -> Result<Option<TsVector>>
    where
        K: for<'q> Encode<'q, Postgres> + Type<Postgres> + Send + 'static,
    {
        let sql = select_statement(table, &mapping.column_name, key_column);
        log::debug!("{sql}");
        let row: Option<Option<TsVector>> = sqlx::query_scalar(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.flatten())
    }

    /// Create missing search-vector columns and GIN indexes.
    pub async fn ensure_schema(&self, table: &TableName, metadata: &ClassMetadata) -> Result<()> {
        for statement in schema_statements(table, metadata) {
            log::debug!("{statement}");
            sqlx::query(&statement).execute(&self.pool).await?;
        }
        log::info!(
            "Ensured {} search vector column(s) on {table}",
            metadata.mappings.len()
        );
        Ok(())
    }
}
