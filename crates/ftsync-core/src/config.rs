//! Declarative mapping configuration.
//!
//! Entities, their fields, and their search vectors can be declared in a
//! TOML file instead of code:
//!
//! ```toml
//! [database]
//! url = "postgres://localhost/blog"
//!
//! [[entity]]
//! name = "Article"
//! table = "articles"
//!
//! [[entity.field]]
//! name = "title"
//! type = "string"
//!
//! [[entity.field]]
//! name = "tags"
//! type = "simple_array"
//! nullable = true
//!
//! [[entity.field]]
//! name = "author_name"
//! kind = "accessor"
//!
//! [[entity.search_vector]]
//! property = "search"
//! fields = ["title", "tags", "author_name"]
//! weight = "A"
//! ```
//!
//! Column fields default to type `string` and NOT NULL.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::declaration::TsVectorDeclaration;
use crate::error::{Error, Result};
use crate::schema::{ColumnType, EntitySchema};

/// Environment variable that overrides `database.url`.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Top-level mapping file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Declared entities.
    #[serde(default, rename = "entity")]
    pub entities: Vec<EntityConfig>,
}

/// Connection settings for the PostgreSQL backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL; `DATABASE_URL` takes precedence.
    pub url: Option<String>,

    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Schema holding entity tables; the search path when absent.
    pub schema: Option<String>,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            schema: None,
        }
    }
}

impl DatabaseConfig {
    /// Connection URL after applying the environment override.
    pub fn resolved_url(&self) -> Result<String> {
        std::env::var(DATABASE_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .or_else(|| self.url.clone())
            .ok_or_else(|| {
                Error::config(format!(
                    "no database URL: set database.url or {DATABASE_URL_ENV}"
                ))
            })
    }
}

/// How a configured field is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKindConfig {
    /// Mapped column.
    #[default]
    Column,
    /// Unmapped readable property.
    Property,
    /// Zero-argument accessor.
    Accessor,
}

/// One declared field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field name.
    pub name: String,

    /// Exposure kind.
    #[serde(default)]
    pub kind: FieldKindConfig,

    /// Storage type (columns only).
    #[serde(default = "default_column_type", rename = "type")]
    pub column_type: ColumnType,

    /// NULL allowed (columns only).
    #[serde(default)]
    pub nullable: bool,
}

fn default_column_type() -> ColumnType {
    ColumnType::String
}

/// One declared entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Entity name.
    pub name: String,

    /// Table name; snake_case of the entity name when absent.
    pub table: Option<String>,

    /// Fields.
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldConfig>,

    /// Search-vector declarations.
    #[serde(default, rename = "search_vector")]
    pub search_vectors: Vec<TsVectorDeclaration>,
}

impl EntityConfig {
    /// Resolved table name.
    pub fn table_name(&self) -> String {
        self.table
            .clone()
            .unwrap_or_else(|| to_snake_case(&self.name))
    }

    /// Build the entity schema.
    pub fn schema(&self) -> EntitySchema {
        let mut builder = EntitySchema::builder(&self.name);
        for field in &self.fields {
            builder = match field.kind {
                FieldKindConfig::Column => {
                    builder.column(&field.name, field.column_type.clone(), field.nullable)
                }
                FieldKindConfig::Property => builder.property(&field.name),
                FieldKindConfig::Accessor => builder.accessor(&field.name),
            };
        }
        for decl in &self.search_vectors {
            builder = builder.search_vector(decl.clone());
        }
        builder.build()
    }
}

impl MappingConfig {
    /// Parse a mapping document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MappingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a mapping file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        log::debug!("Loading mapping config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Schemas for every declared entity.
    pub fn schemas(&self) -> Vec<EntitySchema> {
        self.entities.iter().map(EntityConfig::schema).collect()
    }

    /// Look up an entity by name.
    pub fn entity(&self, name: &str) -> Option<&EntityConfig> {
        self.entities.iter().find(|e| e.name == name)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for entity in &self.entities {
            if entity.name.trim().is_empty() {
                return Err(Error::config("entity name must not be empty"));
            }
            if !seen.insert(entity.name.as_str()) {
                return Err(Error::config(format!(
                    "entity '{}' is declared more than once",
                    entity.name
                )));
            }
        }
        Ok(())
    }
}

/// `BlogPost` -> `blog_post`.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else if c == '-' || c == ' ' {
            out.push('_');
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
