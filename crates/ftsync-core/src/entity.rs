//! Runtime access to entity fields.
//!
//! Entities implement [`Searchable`] so the synchronizer can read source
//! fields by name and store the computed vector back.
//!
//! ```rust
//! use ftsync_core::{
//!     ColumnType, EntitySchema, FieldValue, Searchable, SearchVectorValue, TsVectorDeclaration,
//! };
//!
//! #[derive(Default)]
//! struct Note {
//!     body: String,
//!     search: Option<SearchVectorValue>,
//! }
//!
//! impl Searchable for Note {
//!     fn schema() -> EntitySchema {
//!         EntitySchema::builder("Note")
//!             .column("body", ColumnType::Text, false)
//!             .search_vector(TsVectorDeclaration::builder("search").field("body").build())
//!             .build()
//!     }
//!
//!     fn field_value(&self, name: &str) -> Option<FieldValue> {
//!         match name {
//!             "body" => Some(self.body.as_str().into()),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set_search_vector(&mut self, property: &str, value: SearchVectorValue) {
//!         if property == "search" {
//!             self.search = Some(value);
//!         }
//!     }
//! }
//! ```

use crate::schema::EntitySchema;
use crate::value::SearchVectorValue;

/// The value of one source field at synchronization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A single string.
    Text(String),
    /// A list, flattened with single spaces.
    List(Vec<String>),
    /// No value; contributes nothing.
    Null,
}

impl FieldValue {
    /// Flatten to the text this value contributes, if any.
    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(items) => Some(items.join(" ")),
            FieldValue::Null => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[String]> for FieldValue {
    fn from(value: &[String]) -> Self {
        FieldValue::List(value.to_vec())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// An entity whose search vectors ftsync keeps up to date.
pub trait Searchable {
    /// Static schema, including search-vector declarations.
    fn schema() -> EntitySchema
    where
        Self: Sized;

    /// Read a source field or accessor.
    ///
    /// Return `None` when nothing by that name exists; the synchronizer
    /// skips it.
    fn field_value(&self, name: &str) -> Option<FieldValue>;

    /// Store a computed value in the named property.
    fn set_search_vector(&mut self, property: &str, value: SearchVectorValue);
}
