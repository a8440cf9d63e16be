//! ftsync core: search-vector declarations and entity synchronization.
//!
//! Entities declare which of their fields feed a PostgreSQL `tsvector`
//! column. Before each insert or update the application asks the
//! [`Synchronizer`] to recompute those vectors; the database does the
//! actual parsing and stemming via `to_tsvector`.
//!
//! # Modules
//!
//! - [`weight`], [`language`]: the two knobs a declaration carries
//! - [`declaration`]: [`TsVectorDeclaration`], attached to a property
//! - [`schema`]: [`EntitySchema`], the static description of an entity
//! - [`entity`]: [`Searchable`], runtime access to an entity's fields
//! - [`metadata`]: validation and per-entity [`ClassMetadata`]
//! - [`sync`]: [`Synchronizer`] and [`compute_search_vector`]
//! - [`unit_of_work`]: scheduling entities for the next write
//! - [`config`]: TOML mapping files
//! - [`error`]: error types and Result alias

pub mod config;
pub mod declaration;
pub mod entity;
pub mod error;
pub mod language;
pub mod metadata;
pub mod schema;
pub mod sync;
pub mod unit_of_work;
pub mod value;
pub mod weight;

// Re-export key types at crate root for convenience
pub use config::{DatabaseConfig, EntityConfig, MappingConfig};
pub use declaration::TsVectorDeclaration;
pub use entity::{FieldValue, Searchable};
pub use error::{Error, Result};
pub use language::Language;
pub use metadata::{ClassMetadata, MetadataLoader, MetadataRegistry, SearchVectorMapping};
pub use schema::{ColumnType, EntitySchema, FieldDef, FieldKind};
pub use sync::{LifecycleEvent, Synchronizer, compute_search_vector};
pub use unit_of_work::{FlushPlan, UnitOfWork};
pub use value::SearchVectorValue;
pub use weight::Weight;
