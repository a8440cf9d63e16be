//! Search-vector declarations.
//!
//! A declaration is attached to one entity property and says which other
//! fields feed the vector stored there:
//!
//! ```rust
//! use ftsync_core::{TsVectorDeclaration, Weight};
//!
//! let decl = TsVectorDeclaration::builder("search_title")
//!     .fields(["title", "subtitle"])
//!     .name("title_fts")
//!     .weight(Weight::A)
//!     .build();
//!
//! assert_eq!(decl.column_name(), "title_fts");
//! assert_eq!(decl.language.as_str(), "english");
//! ```

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::weight::Weight;

/// Declares that `property` holds a search vector compiled from `fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsVectorDeclaration {
    /// Entity property receiving the computed value.
    pub property: String,

    /// Source fields, in concatenation order.
    pub fields: Vec<String>,

    /// Target column name; the property name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Weight applied to the whole vector.
    #[serde(default)]
    pub weight: Weight,

    /// Text-search configuration used for stemming.
    #[serde(default)]
    pub language: Language,
}

impl TsVectorDeclaration {
    /// Start a declaration for `property`.
    pub fn builder(property: impl Into<String>) -> TsVectorDeclarationBuilder {
        TsVectorDeclarationBuilder {
            decl: TsVectorDeclaration {
                property: property.into(),
                fields: Vec::new(),
                name: None,
                weight: Weight::default(),
                language: Language::default(),
            },
        }
    }

    /// Resolved column name.
    pub fn column_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.property)
    }
}

/// Builder for [`TsVectorDeclaration`].
#[derive(Debug, Clone)]
pub struct TsVectorDeclarationBuilder {
    decl: TsVectorDeclaration,
}

impl TsVectorDeclarationBuilder {
    /// Append one source field.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.decl.fields.push(field.into());
        self
    }

    /// Append several source fields.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.decl.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Set the target column name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.decl.name = Some(name.into());
        self
    }

    /// Set the weight.
    pub fn weight(mut self, weight: Weight) -> Self {
        self.decl.weight = weight;
        self
    }

    /// Set the language.
    pub fn language(mut self, language: Language) -> Self {
        self.decl.language = language;
        self
    }

    /// Finish the declaration.
    pub fn build(self) -> TsVectorDeclaration {
        self.decl
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
    fn test_builder_defaults() {
        let decl = TsVectorDeclaration::builder("search").field("body").build();
        assert_eq!(decl.fields, vec!["body".to_string()]);
        assert_eq!(decl.weight, Weight::D);
        assert_eq!(decl.language, Language::default());
        assert!(decl.name.is_none());
    }

    #[test]
    fn test_column_name_falls_back_to_property() {
        let decl = TsVectorDeclaration::builder("search").build();
        assert_eq!(decl.column_name(), "search");

        let named = TsVectorDeclaration::builder("search").name("search_fts").build();
        assert_eq!(named.column_name(), "search_fts");
    }

    #[test]
    fn test_builder_field_order_preserved() {
        let decl = TsVectorDeclaration::builder("search")
            .field("a")
            .fields(["b", "c"])
            .build();
        assert_eq!(decl.fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"property": "search", "fields": ["title"]}"#;
        let decl: TsVectorDeclaration = serde_json::from_str(json).unwrap();
        assert_eq!(decl.weight, Weight::D);
        assert_eq!(decl.language.as_str(), "english");
        assert_eq!(decl.column_name(), "search");
    }

    #[test]
    fn test_deserialize_normalizes_weight_and_language() {
        let json = r#"{"property": "s", "fields": [], "weight": "b", "language": "French"}"#;
        let decl: TsVectorDeclaration = serde_json::from_str(json).unwrap();
        assert_eq!(decl.weight, Weight::B);
        assert_eq!(decl.language.as_str(), "french");
    }
}
