//! API Routes
//!
//! Configures the Axum router with all records endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    base64_handler, caesar_handler, create_record_handler, delete_record_handler,
    get_record_handler, health_handler, list_records_handler, reverse_handler, stats_handler,
    update_record_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /records` - Transform input and store a new record
/// - `GET /records` - List all records, newest first
/// - `GET /records/:id` - Fetch one record (cache first)
/// - `PUT /records/:id` - Replace or create a record
/// - `DELETE /records/:id` - Delete a record
/// - `POST /reverse` - Reverse a plain-text body, nothing stored
/// - `POST /caesar?shift=N` - Caesar-shift a plain-text body, nothing stored
/// - `POST /base64` - Base64-encode a plain-text body, nothing stored
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/records",
            get(list_records_handler).post(create_record_handler),
        )
        .route(
            "/records/:id",
            get(get_record_handler)
                .put(update_record_handler)
                .delete(delete_record_handler),
        )
        .route("/reverse", post(reverse_handler))
        .route("/caesar", post(caesar_handler))
        .route("/base64", post(base64_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
