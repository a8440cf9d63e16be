//! Metadata loading.
//!
//! [`MetadataLoader`] validates the search-vector declarations of an
//! [`EntitySchema`] and resolves each one into a [`SearchVectorMapping`]:
//! the column the vector lives in, its weight and language, its
//! nullability, and the sources that feed it.
//!
//! Loading fails with a mapping error when a declaration watches a field the
//! entity does not have, or a mapped column whose storage type is not text
//! compatible (see [`ColumnType::SEARCHABLE`]).
//!
//! [`MetadataRegistry`] caches the result per entity so each schema is
//! validated once.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::declaration::TsVectorDeclaration;
use crate::error::{Error, Result};
use crate::language::Language;
use crate::schema::{ColumnType, EntitySchema, FieldKind};
use crate::weight::Weight;

/// A validated search-vector column on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchVectorMapping {
    /// Property receiving the value.
    pub field_name: String,
    /// Column the vector is stored in.
    pub column_name: String,
    /// Always [`ColumnType::TsVector`].
    pub column_type: ColumnType,
    /// Weight applied to the vector.
    pub weight: Weight,
    /// Text-search configuration.
    pub language: Language,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Source fields, in concatenation order.
    pub sources: Vec<String>,
}

/// All search-vector mappings of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassMetadata {
    /// Entity name.
    pub entity: String,
    /// Mappings in declaration order.
    pub mappings: Vec<SearchVectorMapping>,
}

impl ClassMetadata {
    /// Look up the mapping stored in `property`.
    pub fn mapping(&self, property: &str) -> Option<&SearchVectorMapping> {
        self.mappings.iter().find(|m| m.field_name == property)
    }

    /// True when the entity declares no search vectors.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Validates declarations against an entity schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataLoader;

impl MetadataLoader {
    /// Load and validate every declaration in `schema`.
    pub fn load(schema: &EntitySchema) -> Result<ClassMetadata> {
        let mut mappings = Vec::with_capacity(schema.search_vectors().len());
        let mut properties = HashSet::new();
        let mut columns = HashSet::new();
        let mapped_columns: HashSet<&str> = schema
            .fields()
            .iter()
            .filter(|f| matches!(f.kind, FieldKind::Column { .. }))
            .map(|f| f.name.as_str())
            .collect();

        for decl in schema.search_vectors() {
            Self::check_watch_fields(schema, decl)?;

            if mapped_columns.contains(decl.column_name()) {
                return Err(Error::mapping(
                    schema.entity(),
                    format!("column `{}` is already mapped by a field", decl.column_name()),
                ));
            }
            if schema
                .field(&decl.property)
                .is_some_and(|f| f.kind != FieldKind::Accessor)
            {
                return Err(Error::mapping(
                    schema.entity(),
                    format!("property `{}` is already a mapped field", decl.property),
                ));
            }

            if !properties.insert(decl.property.as_str()) {
                return Err(Error::mapping(
                    schema.entity(),
                    format!("property `{}` declares more than one search vector", decl.property),
                ));
            }
            if !columns.insert(decl.column_name()) {
                return Err(Error::mapping(
                    schema.entity(),
                    format!("column `{}` is mapped more than once", decl.column_name()),
                ));
            }

            let mapping = SearchVectorMapping {
                field_name: decl.property.clone(),
                column_name: decl.column_name().to_string(),
                column_type: ColumnType::TsVector,
                weight: decl.weight,
                language: decl.language.clone(),
                nullable: Self::is_nullable(schema, decl),
                sources: decl.fields.clone(),
            };
            log::debug!(
                "Mapped {}::{} -> column '{}' (weight {}, language {}, nullable {})",
                schema.entity(),
                mapping.field_name,
                mapping.column_name,
                mapping.weight,
                mapping.language,
                mapping.nullable
            );
            mappings.push(mapping);
        }

        Ok(ClassMetadata {
            entity: schema.entity().to_string(),
            mappings,
        })
    }

    fn check_watch_fields(schema: &EntitySchema, decl: &TsVectorDeclaration) -> Result<()> {
        for name in &decl.fields {
            let Some(field) = schema.field(name) else {
                return Err(Error::mapping(
                    schema.entity(),
                    format!("class does not contain `{name}` property or accessor"),
                ));
            };

            if let FieldKind::Column { column_type, .. } = &field.kind
                && !column_type.is_searchable()
            {
                return Err(Error::UnsupportedColumnType {
                    entity: schema.entity().to_string(),
                    property: decl.property.clone(),
                    field: name.clone(),
                    column_type: column_type.to_string(),
                    allowed: ColumnType::searchable_names(),
                });
            }
        }
        Ok(())
    }

    /// Nullable unless every column-backed source is NOT NULL.
    fn is_nullable(schema: &EntitySchema, decl: &TsVectorDeclaration) -> bool {
        let mut column_sources = decl
            .fields
            .iter()
            .filter_map(|name| match &schema.field(name)?.kind {
                FieldKind::Column { nullable, .. } => Some(*nullable),
                _ => None,
            })
            .peekable();

        if column_sources.peek().is_none() {
            return true;
        }
        column_sources.any(|nullable| nullable)
    }
}

/// Per-entity cache of loaded metadata.
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    loaded: HashMap<String, ClassMetadata>,
}

impl MetadataRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return cached metadata for the schema's entity, loading it on first use.
    pub fn get_or_load(&mut self, schema: &EntitySchema) -> Result<&ClassMetadata> {
        if !self.loaded.contains_key(schema.entity()) {
            let metadata = MetadataLoader::load(schema)?;
            log::info!(
                "Loaded {} search vector mapping(s) for {}",
                metadata.mappings.len(),
                metadata.entity
            );
            self.loaded.insert(schema.entity().to_string(), metadata);
        }
        self.loaded
            .get(schema.entity())
            .ok_or_else(|| Error::mapping(schema.entity(), "metadata vanished from registry"))
    }

    /// Cached metadata for `entity`, if loaded.
    pub fn get(&self, entity: &str) -> Option<&ClassMetadata> {
        self.loaded.get(entity)
    }

    /// Number of loaded entities.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// True when nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn article(decl: TsVectorDeclaration) -> EntitySchema {
        EntitySchema::builder("Article")
            .column("title", ColumnType::String, false)
            .column("body", ColumnType::Text, true)
            .column("tags", ColumnType::SimpleArray, false)
            .column("views", ColumnType::Integer, false)
            .property("slug")
            .accessor("author_name")
            .search_vector(decl)
            .build()
    }

    #[test]
    fn test_load_resolves_mapping() {
        let decl = TsVectorDeclaration::builder("search")
            .fields(["title", "author_name"])
            .name("search_fts")
            .weight(Weight::A)
            .language(Language::new("French").unwrap())
            .build();
        let metadata = MetadataLoader::load(&article(decl)).unwrap();

        let mapping = metadata.mapping("search").unwrap();
        assert_eq!(mapping.column_name, "search_fts");
        assert_eq!(mapping.column_type, ColumnType::TsVector);
        assert_eq!(mapping.weight, Weight::A);
        assert_eq!(mapping.language.as_str(), "french");
        assert_eq!(mapping.sources, vec!["title", "author_name"]);
    }

    #[test]
    fn test_load_missing_field_is_mapping_error() {
        let decl = TsVectorDeclaration::builder("search").field("summary").build();
        let err = MetadataLoader::load(&article(decl)).unwrap_err();
        assert!(err.is_mapping_error());
        assert!(err.to_string().contains("`summary`"));
    }

    #[test]
    fn test_load_disallowed_type_is_mapping_error() {
        let decl = TsVectorDeclaration::builder("search")
            .fields(["title", "views"])
            .build();
        let err = MetadataLoader::load(&article(decl)).unwrap_err();
        let Error::UnsupportedColumnType {
            field, column_type, ..
        } = &err
        else {
            unreachable!("Expected UnsupportedColumnType, got {err:?}");
        };
        assert_eq!(field, "views");
        assert_eq!(column_type, "integer");
        assert!(err.is_mapping_error());
    }

    #[test]
    fn test_accessor_and_property_pass_validation() {
        let decl = TsVectorDeclaration::builder("search")
            .fields(["slug", "author_name"])
            .build();
        assert!(MetadataLoader::load(&article(decl)).is_ok());
    }

    #[test]
    fn test_column_name_colliding_with_field_is_rejected() {
        let decl = TsVectorDeclaration::builder("search")
            .name("title")
            .field("title")
            .build();
        let err = MetadataLoader::load(&article(decl)).unwrap_err();
        assert!(err.is_mapping_error());
        assert!(err.to_string().contains("column `title` is already mapped"));
    }

    #[test]
    fn test_property_colliding_with_field_is_rejected() {
        for property in ["body", "slug"] {
            let decl = TsVectorDeclaration::builder(property)
                .name("search_fts")
                .field("title")
                .build();
            let err = MetadataLoader::load(&article(decl)).unwrap_err();
            assert!(err.to_string().contains(&format!("property `{property}`")));
        }
    }

    #[test]
    fn test_nullable_when_any_column_nullable() {
        let decl = TsVectorDeclaration::builder("search")
            .fields(["title", "body"])
            .build();
        let metadata = MetadataLoader::load(&article(decl)).unwrap();
        assert!(metadata.mappings[0].nullable);
    }

    #[test]
    fn test_not_nullable_when_all_columns_not_null() {
        let decl = TsVectorDeclaration::builder("search")
            .fields(["title", "tags", "author_name"])
            .build();
        let metadata = MetadataLoader::load(&article(decl)).unwrap();
        assert!(!metadata.mappings[0].nullable);
    }

    #[test]
    fn test_nullable_without_column_sources() {
        let decl = TsVectorDeclaration::builder("search")
            .fields(["slug", "author_name"])
            .build();
        let metadata = MetadataLoader::load(&article(decl)).unwrap();
        assert!(metadata.mappings[0].nullable);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let schema = EntitySchema::builder("Article")
            .column("title", ColumnType::String, false)
            .search_vector(TsVectorDeclaration::builder("a").name("fts").field("title").build())
            .search_vector(TsVectorDeclaration::builder("b").name("fts").field("title").build())
            .build();
        let err = MetadataLoader::load(&schema).unwrap_err();
        assert!(err.to_string().contains("column `fts`"));
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let schema = EntitySchema::builder("Article")
            .column("title", ColumnType::String, false)
            .search_vector(TsVectorDeclaration::builder("a").field("title").build())
            .search_vector(TsVectorDeclaration::builder("a").name("other").field("title").build())
            .build();
        let err = MetadataLoader::load(&schema).unwrap_err();
        assert!(err.to_string().contains("property `a`"));
    }

    #[test]
    fn test_registry_caches_per_entity() {
        let decl = TsVectorDeclaration::builder("search").field("title").build();
        let schema = article(decl);
        let mut registry = MetadataRegistry::new();
        assert!(registry.is_empty());

        registry.get_or_load(&schema).unwrap();
        registry.get_or_load(&schema).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("Article").is_some());
        assert!(registry.get("Comment").is_none());
    }

    #[test]
    fn test_registry_does_not_cache_failures() {
        let decl = TsVectorDeclaration::builder("search").field("nope").build();
        let mut registry = MetadataRegistry::new();
        assert!(registry.get_or_load(&article(decl)).is_err());
        assert!(registry.is_empty());
    }
}
