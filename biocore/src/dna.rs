use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single unambiguous DNA base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
#[repr(u8)]
pub enum DnaBase {
    A = b'A',
    C = b'C',
    G = b'G',
    T = b'T',
}

impl DnaBase {
    pub fn from_char(c: char) -> Option<Self> {
        Self::from_byte(c.try_into().ok()?)
    }
    pub fn from_byte(b: u8) -> Option<Self> {
        match b.to_ascii_uppercase() {
            b'A' => Some(Self::A),
            b'C' => Some(Self::C),
            b'G' => Some(Self::G),
            b'T' => Some(Self::T),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        self.to_byte() as char
    }
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Watson-Crick complement (A<->T, C<->G).
    pub fn complement(self) -> Self {
        match self {
            Self::A => Self::T,
            Self::T => Self::A,
            Self::C => Self::G,
            Self::G => Self::C,
        }
    }

    pub fn is_purine(self) -> bool {
        matches!(self, Self::A | Self::G)
    }
    pub fn is_pyrimidine(self) -> bool {
        matches!(self, Self::C | Self::T)
    }
}

impl std::fmt::Display for DnaBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl FromStr for DnaBase {
    type Err = DnaDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Self::from_char(c).ok_or(DnaDecodeError::InvalidBaseChar { from: c })
            }
            _ => Err(DnaDecodeError::InvalidInputLength { from: s.to_owned() }),
        }
    }
}

/// `true` iff `s` is non-empty and every byte is an uppercase `A`/`C`/`G`/`T`,
/// i.e. `s` matches the regex `^[ACGT]+$`.
pub fn is_strict_dna(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T'))
}

/// Complements a strict DNA string base-by-base, preserving order (this is a
/// complement, not a reverse complement — callers that want 5'->3' reversal
/// do it themselves). Strings that are not strict DNA (per [`is_strict_dna`])
/// are returned unchanged.
///
/// This is a byte-wise map rather than a chain of substring replacements, so
/// it has no "replace A with T, then accidentally re-replace that T" hazard,
/// unlike an in-place find-and-replace implementation that needs a temporary
/// alphabet to avoid it.
pub fn complement_if_strict_dna(s: &str) -> String {
    if is_strict_dna(s) {
        s.bytes()
            .map(|b| DnaBase::from_byte(b).unwrap().complement().to_byte() as char)
            .collect()
    } else {
        s.to_owned()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DnaDecodeError {
    #[error("expected a single DNA base character, got: {from:?}")]
    InvalidInputLength { from: String },
    #[error("invalid DNA base: {from:?}")]
    InvalidBaseChar { from: char },
}

impl From<DnaDecodeError> for std::io::Error {
    fn from(value: DnaDecodeError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, value)
    }
}
