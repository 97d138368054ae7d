//! Models Module
//!
//! The record data model and the request/response DTOs of the HTTP API.

mod record;
mod requests;
mod responses;

pub use record::Record;
pub use requests::{ShiftQuery, TransformRequest};
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
