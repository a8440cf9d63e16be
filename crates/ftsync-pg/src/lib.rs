//! PostgreSQL integration for ftsync.
//!
//! ftsync-core computes `{text, language, weight}` values; this crate gets
//! them into and out of PostgreSQL over `sqlx`.
//!
//! # Modules
//!
//! - [`tsvector`]: [`TsVector`], the binary and text wire codec for reading
//!   columns back
//! - [`sql`]: identifier quoting and the `setweight(to_tsvector(..))`
//!   expression values are written through
//! - [`ddl`]: `ALTER TABLE` / `CREATE INDEX` statements for mapped columns
//! - [`store`]: [`SearchVectorStore`], async reads and writes over a pool
//! - [`error`]: error types and Result alias

#![forbid(unsafe_code)]

pub mod ddl;
pub mod error;
pub mod sql;
pub mod store;
pub mod tsvector;

pub use error::{Error, Result};
pub use sql::{TableName, bind_search_vector, quote_identifier, to_tsvector_expr};
pub use store::SearchVectorStore;
pub use tsvector::{Lexeme, LexemePosition, TsVector};
