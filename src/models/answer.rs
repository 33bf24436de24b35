//! Option letters and answer normalization.
//!
//! Stored correct answers and live user input go through the same
//! [`normalize`] so the two always compare on equal terms.

use std::fmt;

use serde::Serialize;

/// Canonical identifier of an answer choice by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Zero-based position of the option this letter names.
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Result of normalizing a raw answer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedAnswer {
    Letter(OptionLetter),
    /// Trimmed, upper-cased input that matched no known form.
    Unrecognized(String),
}

impl NormalizedAnswer {
    pub fn letter(&self) -> Option<OptionLetter> {
        match self {
            Self::Letter(letter) => Some(*letter),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Letter(OptionLetter::A) => "A",
            Self::Letter(OptionLetter::B) => "B",
            Self::Letter(OptionLetter::C) => "C",
            Self::Letter(OptionLetter::D) => "D",
            Self::Unrecognized(raw) => raw,
        }
    }
}

const WORD_FORMS: [(&str, OptionLetter); 12] = [
    ("FIRST", OptionLetter::A),
    ("1ST", OptionLetter::A),
    ("ONE", OptionLetter::A),
    ("SECOND", OptionLetter::B),
    ("2ND", OptionLetter::B),
    ("TWO", OptionLetter::B),
    ("THIRD", OptionLetter::C),
    ("3RD", OptionLetter::C),
    ("THREE", OptionLetter::C),
    ("FOURTH", OptionLetter::D),
    ("4TH", OptionLetter::D),
    ("FOUR", OptionLetter::D),
];

/// Map an answer token to a canonical option letter.
///
/// Forms are tried in a fixed order: a bare letter, then a number `1`-`4`
/// (leading zeros allowed), then an ordinal or cardinal word. Anything else comes back as
/// [`NormalizedAnswer::Unrecognized`] holding the trimmed, upper-cased input.
pub fn normalize(raw: &str) -> NormalizedAnswer {
    let token = raw.trim().to_uppercase();
    let key = if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        token.trim_start_matches('0')
    } else {
        token.as_str()
    };

    let letter = match key {
        "A" | "1" => Some(OptionLetter::A),
        "B" | "2" => Some(OptionLetter::B),
        "C" | "3" => Some(OptionLetter::C),
        "D" | "4" => Some(OptionLetter::D),
        other => WORD_FORMS
            .iter()
            .find(|(word, _)| *word == other)
            .map(|(_, letter)| *letter),
    };

    match letter {
        Some(letter) => NormalizedAnswer::Letter(letter),
        None => NormalizedAnswer::Unrecognized(token),
    }
}
