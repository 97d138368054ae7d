//! Request DTOs for the records API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::transform::TransformKind;

/// Request body for creating or replacing a record
/// (`POST /records`, `PUT /records/:id`).
///
/// # Fields
/// - `type`: One of `reverse`, `caesar`, `base64`
/// - `shift`: Caesar shift, required (non-zero) for `caesar`
/// - `input`: Text to transform
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransformRequest {
    /// Requested transformation name
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Caesar shift
    #[serde(default)]
    pub shift: i32,
    /// Text to transform
    #[serde(default)]
    pub input: String,
}

impl TransformRequest {
    /// Validates the request data and resolves the transformation kind.
    pub fn validate(&self) -> Result<TransformKind> {
        let kind: TransformKind = self.kind.parse().map_err(|_| {
            AppError::Validation(
                "expected transformation type field: reverse/caesar/base64".to_string(),
            )
        })?;
        if kind == TransformKind::Caesar && self.shift == 0 {
            return Err(AppError::Validation(
                "expected shift field (not 0)".to_string(),
            ));
        }
        if self.input.is_empty() {
            return Err(AppError::Validation("expected input field".to_string()));
        }
        Ok(kind)
    }
}

/// Query string of `POST /caesar`.
///
/// `shift` stays a raw string so a missing or non-numeric value is reported
/// as a JSON error instead of the extractor's plain-text rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiftQuery {
    pub shift: Option<String>,
}

impl ShiftQuery {
    /// Parses the shift; any integer is accepted, including 0.
    pub fn shift(&self) -> Result<i32> {
        self.shift
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .ok_or_else(|| AppError::BadRequest("no integer shift given".to_string()))
    }
}
