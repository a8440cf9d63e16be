//! The `tsvector` wire codec.
//!
//! Reading a `tsvector` column back gives a [`TsVector`]: a sorted list of
//! lexemes, each with the positions (and weights) it occurred at. Both
//! PostgreSQL wire formats are supported:
//!
//! - binary (`tsvectorsend`/`tsvectorrecv`): an `i32` lexeme count, then per
//!   lexeme a NUL-terminated UTF-8 word, a `u16` position count and that many
//!   `u16` entries `(weight_bits << 14) | position`, all big-endian;
//! - text (`tsvectorout`): `'fat':2,4A 'rat':3B`.
//!
//! Lexemes are kept in the order PostgreSQL stores them (bytewise), with
//! duplicates merged, so a value read from the database compares equal to
//! the same value parsed from text.
//!
//! Search-vector *values* are not built here: stemming happens server-side
//! in `to_tsvector`. See [`crate::sql`].

use std::fmt;
use std::str::FromStr;

use ftsync_core::Weight;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{
    PgArgumentBuffer, PgHasArrayType, PgTypeInfo, PgValueFormat, PgValueRef, Postgres,
};
use sqlx::{Decode, Encode, Type};

use crate::error::{Error, Result};

/// Largest position PostgreSQL records; larger ones are clamped.
pub const MAX_POSITION: u16 = (1 << 14) - 1;

/// Most positions kept per lexeme.
pub const MAX_POSITIONS_PER_LEXEME: usize = 256;

/// Longest lexeme in bytes.
pub const MAX_LEXEME_BYTES: usize = 2047;

/// One occurrence of a lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LexemePosition {
    /// 1-based word position, at most [`MAX_POSITION`].
    pub position: u16,
    /// Weight label.
    pub weight: Weight,
}

impl LexemePosition {
    /// Create a position, clamping to [`MAX_POSITION`].
    pub fn new(position: u16, weight: Weight) -> Self {
        Self {
            position: position.min(MAX_POSITION),
            weight,
        }
    }

    fn to_wire(self) -> u16 {
        (self.weight.bits() << 14) | (self.position & MAX_POSITION)
    }

    fn from_wire(raw: u16) -> Self {
        Self {
            position: raw & MAX_POSITION,
            weight: Weight::from_bits(raw >> 14),
        }
    }
}

/// A normalized word with its positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lexeme {
    /// The lexeme text.
    pub word: String,
    /// Positions in ascending order; empty for a position-less lexeme.
    pub positions: Vec<LexemePosition>,
}

impl Lexeme {
    /// A lexeme without positions.
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            positions: Vec::new(),
        }
    }

    /// Add a position.
    pub fn at(mut self, position: u16, weight: Weight) -> Self {
        self.positions.push(LexemePosition::new(position, weight));
        self
    }

    fn normalize_positions(&mut self) {
        self.positions.sort_by_key(|p| p.position);
        // Duplicate positions keep the highest-ranked weight.
        let mut merged: Vec<LexemePosition> = Vec::with_capacity(self.positions.len());
        for pos in self.positions.drain(..) {
            match merged.last_mut() {
                Some(last) if last.position == pos.position => {
                    if pos.weight.bits() > last.weight.bits() {
                        last.weight = pos.weight;
                    }
                }
                _ => merged.push(pos),
            }
        }
        merged.truncate(MAX_POSITIONS_PER_LEXEME);
        self.positions = merged;
    }
}

/// A decoded PostgreSQL `tsvector`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TsVector {
    lexemes: Vec<Lexeme>,
}

impl TsVector {
    /// Build a vector, sorting lexemes and merging duplicates.
    pub fn new(lexemes: impl IntoIterator<Item = Lexeme>) -> Self {
        let mut lexemes: Vec<Lexeme> = lexemes.into_iter().collect();
        lexemes.sort_by(|a, b| a.word.cmp(&b.word));

        let mut merged: Vec<Lexeme> = Vec::with_capacity(lexemes.len());
        for lexeme in lexemes {
            match merged.last_mut() {
                Some(last) if last.word == lexeme.word => last.positions.extend(lexeme.positions),
                _ => merged.push(lexeme),
            }
        }
        for lexeme in &mut merged {
            lexeme.normalize_positions();
        }
        Self { lexemes: merged }
    }

    /// Lexemes in storage order.
    pub fn lexemes(&self) -> &[Lexeme] {
        &self.lexemes
    }

    /// Number of distinct lexemes.
    pub fn len(&self) -> usize {
        self.lexemes.len()
    }

    /// True for the empty vector.
    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty()
    }

    /// Look up a lexeme by word.
    pub fn get(&self, word: &str) -> Option<&Lexeme> {
        self.lexemes
            .binary_search_by(|l| l.word.as_str().cmp(word))
            .ok()
            .map(|i| &self.lexemes[i])
    }

    /// Whether `word` is present.
    pub fn contains(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    /// Iterate over the words.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.lexemes.iter().map(|l| l.word.as_str())
    }

    // ------------------------------------------------------------------------
    // Binary format
    // ------------------------------------------------------------------------

    /// Decode the binary wire format.
    pub fn decode_binary(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader { bytes, offset: 0 };
        let count = reader.read_i32()?;
        let count = usize::try_from(count)
            .map_err(|_| Error::codec(format!("negative lexeme count {count}")))?;

        let mut lexemes = Vec::with_capacity(count.min(bytes.len()));
        for _ in 0..count {
            let word = reader.read_cstr()?;
            let npos = usize::from(reader.read_u16()?);
            let mut positions = Vec::with_capacity(npos);
            for _ in 0..npos {
                positions.push(LexemePosition::from_wire(reader.read_u16()?));
            }
            lexemes.push(Lexeme { word, positions });
        }

        if reader.offset != bytes.len() {
            return Err(Error::codec(format!(
                "{} trailing byte(s) after {count} lexeme(s)",
                bytes.len() - reader.offset
            )));
        }
        Ok(Self::new(lexemes))
    }

    /// Append the binary wire format to `buf`.
    pub fn encode_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        let count = i32::try_from(self.lexemes.len())
            .map_err(|_| Error::codec("too many lexemes"))?;
        buf.extend_from_slice(&count.to_be_bytes());

        for lexeme in &self.lexemes {
            validate_word(&lexeme.word)?;
            buf.extend_from_slice(lexeme.word.as_bytes());
            buf.push(0);
            // normalize_positions caps the count well below u16::MAX
            let npos = lexeme.positions.len() as u16;
            buf.extend_from_slice(&npos.to_be_bytes());
            for pos in &lexeme.positions {
                if pos.position == 0 {
                    return Err(Error::codec(format!(
                        "lexeme '{}' has position 0",
                        lexeme.word
                    )));
                }
                buf.extend_from_slice(&pos.to_wire().to_be_bytes());
            }
        }
        Ok(())
    }
}

fn validate_word(word: &str) -> Result<()> {
    if word.is_empty() {
        return Err(Error::codec("empty lexeme"));
    }
    if word.len() > MAX_LEXEME_BYTES {
        return Err(Error::codec(format!(
            "lexeme of {} bytes exceeds {MAX_LEXEME_BYTES}",
            word.len()
        )));
    }
    if word.contains('\0') {
        return Err(Error::codec("lexeme contains a NUL byte"));
    }
    Ok(())
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn take(&mut self, n: usize) -> Result<&[u8]> {
        let end = self
            .offset
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| Error::codec(format!("truncated at byte {}", self.offset)))?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn read_i32(&mut self) -> Result<i32> {
        let raw = self.take(4)?;
        Ok(i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    fn read_u16(&mut self) -> Result<u16> {
        let raw = self.take(2)?;
        Ok(u16::from_be_bytes([raw[0], raw[1]]))
    }

    fn read_cstr(&mut self) -> Result<String> {
        let rest = &self.bytes[self.offset..];
        let len = rest
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| Error::codec(format!("unterminated lexeme at byte {}", self.offset)))?;
        let word = std::str::from_utf8(&rest[..len])
            .map_err(|e| Error::codec(format!("lexeme is not UTF-8: {e}")))?
            .to_string();
        self.offset += len + 1;
        Ok(word)
    }
}

// ============================================================================
// Text format
// ============================================================================

impl fmt::Display for TsVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, lexeme) in self.lexemes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str("'")?;
            for c in lexeme.word.chars() {
                match c {
                    '\'' => f.write_str("''")?,
                    '\\' => f.write_str("\\\\")?,
                    _ => write!(f, "{c}")?,
                }
            }
            f.write_str("'")?;
            for (j, pos) in lexeme.positions.iter().enumerate() {
                f.write_str(if j == 0 { ":" } else { "," })?;
                write!(f, "{}", pos.position)?;
                if pos.weight != Weight::D {
                    write!(f, "{}", pos.weight)?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for TsVector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars().peekable();
        let mut lexemes = Vec::new();

        loop {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            let Some(&first) = chars.peek() else {
                break;
            };

            let mut word = String::new();
            if first == '\'' {
                chars.next();
                loop {
                    match chars.next() {
                        Some('\'') if chars.peek() == Some(&'\'') => {
                            chars.next();
                            word.push('\'');
                        }
                        Some('\'') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped) => word.push(escaped),
                            None => return Err(Error::codec("dangling escape")),
                        },
                        Some(c) => word.push(c),
                        None => return Err(Error::codec("unterminated quoted lexeme")),
                    }
                }
            } else {
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == ':' {
                        break;
                    }
                    chars.next();
                    if c == '\\' {
                        match chars.next() {
                            Some(escaped) => word.push(escaped),
                            None => return Err(Error::codec("dangling escape")),
                        }
                    } else {
                        word.push(c);
                    }
                }
            }
            validate_word(&word)?;

            let mut lexeme = Lexeme::new(word);
            if chars.next_if_eq(&':').is_some() {
                loop {
                    let mut digits = String::new();
                    while let Some(d) = chars.next_if(char::is_ascii_digit) {
                        digits.push(d);
                    }
                    let position: u32 = digits.parse().map_err(|_| {
                        Error::codec(format!("missing position for lexeme '{}'", lexeme.word))
                    })?;
                    if position == 0 {
                        return Err(Error::codec(format!(
                            "wrong position info for lexeme '{}'",
                            lexeme.word
                        )));
                    }
                    let weight = match chars.next_if(|c| "AaBbCcDd".contains(*c)) {
                        Some(c) => c.to_string().parse()?,
                        None => Weight::D,
                    };
                    let clamped = u16::try_from(position).unwrap_or(MAX_POSITION);
                    lexeme = lexeme.at(clamped, weight);
                    if chars.next_if_eq(&',').is_none() {
                        break;
                    }
                }
            }

            if let Some(&c) = chars.peek()
                && !c.is_whitespace()
            {
                return Err(Error::codec(format!("unexpected '{c}' in tsvector")));
            }
            lexemes.push(lexeme);
        }

        Ok(Self::new(lexemes))
    }
}

// ============================================================================
// sqlx integration
// ============================================================================

impl Type<Postgres> for TsVector {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("tsvector")
    }
}

impl PgHasArrayType for TsVector {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_tsvector")
    }
}

impl<'r> Decode<'r, Postgres> for TsVector {
    fn decode(value: PgValueRef<'r>) -> std::result::Result<Self, BoxDynError> {
        match value.format() {
            PgValueFormat::Binary => Ok(TsVector::decode_binary(value.as_bytes()?)?),
            PgValueFormat::Text => Ok(value.as_str()?.parse()?),
        }
    }
}

impl Encode<'_, Postgres> for TsVector {
    fn encode_by_ref(
        &self,
        buf: &mut PgArgumentBuffer,
    ) -> std::result::Result<IsNull, BoxDynError> {
        self.encode_binary(buf)?;
        Ok(IsNull::No)
    }
}

// ============================================================================
// Tests
// ============================================================================
