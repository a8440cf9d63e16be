//! Computed search-vector values.

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::weight::Weight;

/// The record written into a search-vector property before each write.
///
/// The database turns it into a `tsvector` with
/// `setweight(to_tsvector(language, text), weight)`; nothing here is
/// tokenized or stemmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchVectorValue {
    /// Space-joined source text.
    pub text: String,
    /// Text-search configuration used for stemming.
    pub language: Language,
    /// Weight applied to every lexeme.
    pub weight: Weight,
}

impl SearchVectorValue {
    /// Create a value from its parts.
    pub fn new(text: impl Into<String>, language: Language, weight: Weight) -> Self {
        Self {
            text: text.into(),
            language,
            weight,
        }
    }

    /// True when no source contributed any text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_value_json_shape() {
        let value = SearchVectorValue::new("hello x y", Language::default(), Weight::A);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["text"], "hello x y");
        assert_eq!(json["language"], "english");
        assert_eq!(json["weight"], "A");
    }

    #[test]
    fn test_value_default_is_empty() {
        let value = SearchVectorValue::default();
        assert!(value.is_empty());
        assert_eq!(value.weight, Weight::D);
    }
}
