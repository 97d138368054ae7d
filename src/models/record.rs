//! Record model
//!
//! A persisted transformation result with identity and timestamps.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transform::TransformKind;

/// A stored transformation result.
///
/// `id` never changes once assigned; every other field is replaced wholesale
/// by an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque unique identifier (UUID v4 for service-created records)
    pub id: String,
    /// Which transformation produced `result`
    #[serde(rename = "type")]
    pub kind: TransformKind,
    /// Caesar shift; zero for the other kinds
    #[serde(default)]
    pub shift: i32,
    /// Transformation output
    pub result: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    // == Constructor ==
    /// Creates a record under a freshly generated id, stamped with the current time.
    pub fn new(kind: TransformKind, shift: i32, result: String) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), kind, shift, result)
    }

    /// Creates a record under a caller-chosen id.
    pub fn with_id(id: impl Into<String>, kind: TransformKind, shift: i32, result: String) -> Self {
        Self {
            id: id.into(),
            kind,
            shift,
            result,
            created_at: now(),
            updated_at: None,
        }
    }

    // == Replace ==
    /// Replaces the transformation fields and stamps `updated_at`.
    ///
    /// `id` and `created_at` are kept.
    pub fn replace(&mut self, kind: TransformKind, shift: i32, result: String) {
        self.kind = kind;
        self.shift = shift;
        self.result = result;
        self.updated_at = Some(now());
    }
}

/// Current time at the microsecond precision the store keeps.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
