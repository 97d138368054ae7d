//! Transform Module
//!
//! Pure text transformations applied to record input: string reversal,
//! Caesar cipher and Base64 encoding.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// == Transform Kind ==
/// The closed set of transformations a record can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    Reverse,
    Caesar,
    Base64,
}

/// Returned when a string does not name a known transformation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown transformation type: {0}")]
pub struct UnknownKind(pub String);

impl TransformKind {
    /// Lowercase name used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Reverse => "reverse",
            TransformKind::Caesar => "caesar",
            TransformKind::Base64 => "base64",
        }
    }

    // == Effective Shift ==
    /// The shift a record of this kind keeps: `shift` for Caesar, 0 otherwise.
    pub fn effective_shift(&self, shift: i32) -> i32 {
        match self {
            TransformKind::Caesar => shift,
            TransformKind::Reverse | TransformKind::Base64 => 0,
        }
    }

    // == Apply ==
    /// Runs this transformation over `input`.
    ///
    /// `shift` is only read by [`TransformKind::Caesar`].
    pub fn apply(&self, input: &str, shift: i32) -> String {
        match self {
            TransformKind::Reverse => reverse(input),
            TransformKind::Caesar => caesar(input, shift),
            TransformKind::Base64 => base64(input),
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reverse" => Ok(TransformKind::Reverse),
            "caesar" => Ok(TransformKind::Caesar),
            "base64" => Ok(TransformKind::Base64),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

// == Transformations ==
/// Reverses the input by Unicode scalar value.
pub fn reverse(input: &str) -> String {
    input.chars().rev().collect()
}

/// Rotates ASCII letters by `shift` positions, wrapping within their case.
///
/// Non-letters pass through unchanged. Negative shifts rotate backwards.
pub fn caesar(input: &str, shift: i32) -> String {
    let offset = shift.rem_euclid(26) as u8;
    input
        .chars()
        .map(|c| match c {
            'a'..='z' => rotate(c, b'a', offset),
            'A'..='Z' => rotate(c, b'A', offset),
            _ => c,
        })
        .collect()
}

fn rotate(c: char, base: u8, offset: u8) -> char {
    (((c as u8 - base + offset) % 26) + base) as char
}

/// Encodes the UTF-8 bytes of the input with the standard padded alphabet.
pub fn base64(input: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(input.as_bytes())
}
