//! Static entity schemas.
//!
//! An [`EntitySchema`] tells the metadata loader what an entity exposes:
//! mapped columns with their storage type and nullability, plain readable
//! properties, and zero-argument accessors. Search-vector declarations are
//! attached to the same schema.
//!
//! ```rust
//! use ftsync_core::{ColumnType, EntitySchema, TsVectorDeclaration};
//!
//! let schema = EntitySchema::builder("Article")
//!     .column("title", ColumnType::String, false)
//!     .column("tags", ColumnType::SimpleArray, true)
//!     .accessor("author_name")
//!     .search_vector(
//!         TsVectorDeclaration::builder("search")
//!             .fields(["title", "tags", "author_name"])
//!             .build(),
//!     )
//!     .build();
//!
//! assert!(schema.field("title").is_some());
//! assert_eq!(schema.search_vectors().len(), 1);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::declaration::TsVectorDeclaration;

/// Declared storage type of a mapped column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Short string (`varchar`).
    String,
    /// Unbounded text.
    Text,
    /// Serialized array.
    Array,
    /// Comma-separated array.
    SimpleArray,
    /// JSON document.
    Json,
    /// JSON array.
    JsonArray,
    /// 32-bit integer.
    Integer,
    /// 16-bit integer.
    SmallInt,
    /// 64-bit integer.
    BigInt,
    /// Boolean.
    Boolean,
    /// Fixed-point decimal.
    Decimal,
    /// Floating point.
    Float,
    /// Calendar date.
    Date,
    /// Timestamp.
    DateTime,
    /// Time of day.
    Time,
    /// UUID.
    Guid,
    /// Short binary string.
    Binary,
    /// Large binary object.
    Blob,
    /// Full-text search vector.
    TsVector,
    /// Any type not listed above, by name.
    Other(String),
}

impl ColumnType {
    /// Types a search vector may watch.
    pub const SEARCHABLE: [ColumnType; 6] = [
        ColumnType::String,
        ColumnType::Text,
        ColumnType::Array,
        ColumnType::SimpleArray,
        ColumnType::Json,
        ColumnType::JsonArray,
    ];

    /// Lowercase type name.
    pub fn name(&self) -> &str {
        match self {
            ColumnType::String => "string",
            ColumnType::Text => "text",
            ColumnType::Array => "array",
            ColumnType::SimpleArray => "simple_array",
            ColumnType::Json => "json",
            ColumnType::JsonArray => "json_array",
            ColumnType::Integer => "integer",
            ColumnType::SmallInt => "smallint",
            ColumnType::BigInt => "bigint",
            ColumnType::Boolean => "boolean",
            ColumnType::Decimal => "decimal",
            ColumnType::Float => "float",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Time => "time",
            ColumnType::Guid => "guid",
            ColumnType::Binary => "binary",
            ColumnType::Blob => "blob",
            ColumnType::TsVector => "tsvector",
            ColumnType::Other(name) => name.as_str(),
        }
    }

    /// Whether this type is in [`ColumnType::SEARCHABLE`].
    pub fn is_searchable(&self) -> bool {
        Self::SEARCHABLE.contains(self)
    }

    /// The allow-list as it appears in error messages.
    pub fn searchable_names() -> String {
        Self::SEARCHABLE
            .iter()
            .map(ColumnType::name)
            .collect::<Vec<_>>()
            .join("\" | \"")
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColumnType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Ok(match lower.as_str() {
            "string" => ColumnType::String,
            "text" => ColumnType::Text,
            "array" => ColumnType::Array,
            "simple_array" => ColumnType::SimpleArray,
            "json" => ColumnType::Json,
            "json_array" => ColumnType::JsonArray,
            "integer" => ColumnType::Integer,
            "smallint" => ColumnType::SmallInt,
            "bigint" => ColumnType::BigInt,
            "boolean" => ColumnType::Boolean,
            "decimal" => ColumnType::Decimal,
            "float" => ColumnType::Float,
            "date" => ColumnType::Date,
            "datetime" => ColumnType::DateTime,
            "time" => ColumnType::Time,
            "guid" => ColumnType::Guid,
            "binary" => ColumnType::Binary,
            "blob" => ColumnType::Blob,
            "tsvector" => ColumnType::TsVector,
            _ => ColumnType::Other(lower),
        })
    }
}

impl Serialize for ColumnType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let Ok(column_type) = raw.parse::<ColumnType>();
        Ok(column_type)
    }
}

/// How an entity exposes a named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A mapped column.
    Column {
        /// Declared storage type.
        column_type: ColumnType,
        /// Whether the column accepts NULL.
        nullable: bool,
    },
    /// A readable property that is not mapped to a column.
    Property,
    /// A zero-argument accessor.
    Accessor,
}

/// A named field on an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// How the field is exposed.
    pub kind: FieldKind,
}

/// Static description of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    entity: String,
    fields: Vec<FieldDef>,
    search_vectors: Vec<TsVectorDeclaration>,
}

impl EntitySchema {
    /// Start a schema for `entity`.
    pub fn builder(entity: impl Into<String>) -> EntitySchemaBuilder {
        EntitySchemaBuilder {
            schema: EntitySchema {
                entity: entity.into(),
                fields: Vec::new(),
                search_vectors: Vec::new(),
            },
        }
    }

    /// Entity name.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Search-vector declarations in declaration order.
    pub fn search_vectors(&self) -> &[TsVectorDeclaration] {
        &self.search_vectors
    }

    /// Look up a field by name.
    ///
    /// An accessor wins over a property or column registered under the same
    /// name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        let mut found = None;
        for field in self.fields.iter().filter(|f| f.name == name) {
            if field.kind == FieldKind::Accessor {
                return Some(field);
            }
            found.get_or_insert(field);
        }
        found
    }
}

/// Builder for [`EntitySchema`].
#[derive(Debug, Clone)]
pub struct EntitySchemaBuilder {
    schema: EntitySchema,
}

impl EntitySchemaBuilder {
    /// Add a mapped column.
    pub fn column(
        mut self,
        name: impl Into<String>,
        column_type: ColumnType,
        nullable: bool,
    ) -> Self {
        self.schema.fields.push(FieldDef {
            name: name.into(),
            kind: FieldKind::Column {
                column_type,
                nullable,
            },
        });
        self
    }

    /// Add a readable, unmapped property.
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.schema.fields.push(FieldDef {
            name: name.into(),
            kind: FieldKind::Property,
        });
        self
    }

    /// Add a zero-argument accessor.
    pub fn accessor(mut self, name: impl Into<String>) -> Self {
        self.schema.fields.push(FieldDef {
            name: name.into(),
            kind: FieldKind::Accessor,
        });
        self
    }

    /// Attach a search-vector declaration.
    pub fn search_vector(mut self, declaration: TsVectorDeclaration) -> Self {
        self.schema.search_vectors.push(declaration);
        self
    }

    /// Finish the schema.
    pub fn build(self) -> EntitySchema {
        self.schema
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_parse_known() {
        assert_eq!("simple_array".parse::<ColumnType>().unwrap(), ColumnType::SimpleArray);
        assert_eq!("TEXT".parse::<ColumnType>().unwrap(), ColumnType::Text);
        assert_eq!("json_array".parse::<ColumnType>().unwrap(), ColumnType::JsonArray);
    }

    #[test]
    fn test_column_type_parse_other() {
        let parsed: ColumnType = "citext".parse().unwrap();
        assert_eq!(parsed, ColumnType::Other("citext".to_string()));
        assert_eq!(parsed.to_string(), "citext");
        assert!(!parsed.is_searchable());
    }

    #[test]
    fn test_searchable_allow_list() {
        assert!(ColumnType::String.is_searchable());
        assert!(ColumnType::Json.is_searchable());
        assert!(!ColumnType::Integer.is_searchable());
        assert!(!ColumnType::TsVector.is_searchable());
        assert_eq!(
            ColumnType::searchable_names(),
            "string\" | \"text\" | \"array\" | \"simple_array\" | \"json\" | \"json_array"
        );
    }

    #[test]
    fn test_column_type_serde() {
        let parsed: ColumnType = serde_json::from_str("\"datetime\"").unwrap();
        assert_eq!(parsed, ColumnType::DateTime);
        assert_eq!(serde_json::to_string(&ColumnType::SimpleArray).unwrap(), "\"simple_array\"");
    }

    #[test]
    fn test_field_lookup_prefers_accessor() {
        let schema = EntitySchema::builder("Post")
            .column("title", ColumnType::Integer, false)
            .accessor("title")
            .build();
        assert_eq!(schema.field("title").unwrap().kind, FieldKind::Accessor);
    }

    #[test]
    fn test_field_lookup_missing() {
        let schema = EntitySchema::builder("Post").property("slug").build();
        assert!(schema.field("body").is_none());
        assert_eq!(schema.field("slug").unwrap().kind, FieldKind::Property);
    }

    #[test]
    fn test_builder_keeps_order() {
        let schema = EntitySchema::builder("Post")
            .column("a", ColumnType::Text, true)
            .property("b")
            .accessor("c")
            .build();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(schema.entity(), "Post");
    }
}
