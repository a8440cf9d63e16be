//! Text-search configuration names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Configuration used when no language is declared.
pub const DEFAULT_LANGUAGE: &str = "english";

/// A PostgreSQL text-search configuration (`regconfig`) name.
///
/// Names are lowercased on construction and must be one identifier or a
/// schema-qualified pair, e.g. `english` or `public.matric_english`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language(String);

impl Language {
    /// Validate and normalize a configuration name.
    pub fn new(name: &str) -> Result<Self> {
        let normalized = name.trim().to_lowercase();
        let parts: Vec<&str> = normalized.split('.').collect();
        if parts.len() > 2 || !parts.iter().all(|p| is_identifier(p)) {
            return Err(Error::InvalidLanguage(name.to_string()));
        }
        Ok(Self(normalized))
    }

    /// The normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl Default for Language {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Language::new(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
