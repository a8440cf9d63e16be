//! Search-vector weights.
//!
//! PostgreSQL labels every lexeme position with one of four weights. Ranking
//! functions such as `ts_rank` use the label to bias relevance toward the
//! fields that produced the lexeme.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Ordinal rank attached to a search vector, `A` highest and `D` lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Weight {
    /// Highest rank.
    A,
    /// Second rank.
    B,
    /// Third rank.
    C,
    /// Lowest rank, and the one PostgreSQL assigns when none is given.
    #[default]
    D,
}

impl Weight {
    /// All weights from highest to lowest.
    pub const ALL: [Weight; 4] = [Weight::A, Weight::B, Weight::C, Weight::D];

    /// The weight as its uppercase letter.
    pub fn as_char(self) -> char {
        match self {
            Weight::A => 'A',
            Weight::B => 'B',
            Weight::C => 'C',
            Weight::D => 'D',
        }
    }

    /// The 2-bit code stored in the high bits of a tsvector position entry.
    pub fn bits(self) -> u16 {
        match self {
            Weight::A => 3,
            Weight::B => 2,
            Weight::C => 1,
            Weight::D => 0,
        }
    }

    /// Inverse of [`Weight::bits`]. Only the low two bits are considered.
    pub fn from_bits(bits: u16) -> Self {
        match bits & 0b11 {
            3 => Weight::A,
            2 => Weight::B,
            1 => Weight::C,
            _ => Weight::D,
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Weight {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Weight::A),
            "B" => Ok(Weight::B),
            "C" => Ok(Weight::C),
            "D" => Ok(Weight::D),
            _ => Err(Error::InvalidWeight(s.to_string())),
        }
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
