//! API Module
//!
//! HTTP handlers and routing for the records REST API.
//!
//! # Endpoints
//! - `POST /records` - Create a record from a transform request
//! - `GET /records` - List records
//! - `GET /records/:id` - Fetch a record
//! - `PUT /records/:id` - Replace a record
//! - `DELETE /records/:id` - Delete a record
//! - `POST /reverse`, `POST /caesar?shift=N`, `POST /base64` - Stateless transforms
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
