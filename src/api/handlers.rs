//! API Handlers
//!
//! HTTP request handlers for each records endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::CacheStrategy;
use crate::error::Result;
use crate::models::{HealthResponse, Record, ShiftQuery, StatsResponse, TransformRequest};
use crate::service::RecordService;
use crate::transform;

/// JSON body whose decoding failure surfaces as a 400 `AppError`.
type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record service holding the store and the cache
    pub service: Arc<RecordService>,
    /// Cache strategy the service was built with
    pub strategy: CacheStrategy,
}

impl AppState {
    /// Creates a new AppState around an already-built service.
    pub fn new(service: RecordService, strategy: CacheStrategy) -> Self {
        Self {
            service: Arc::new(service),
            strategy,
        }
    }
}

/// Handler for POST /records
///
/// Validates the request, transforms the input and stores the result.
pub async fn create_record_handler(
    State(state): State<AppState>,
    payload: JsonBody<TransformRequest>,
) -> Result<(StatusCode, Json<Record>)> {
    let Json(req) = payload?;
    let kind = req.validate()?;
    let record = state
        .service
        .create_record(kind, req.shift, &req.input)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for GET /records
pub async fn list_records_handler(State(state): State<AppState>) -> Result<Json<Vec<Record>>> {
    let records = state.service.list_records().await?;
    Ok(Json(records))
}

/// Handler for GET /records/:id
pub async fn get_record_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>> {
    let record = state.service.get_record(&id).await?;
    Ok(Json(record))
}

/// Handler for PUT /records/:id
///
/// Replaces the record's transformation, creating the record if the id is new.
pub async fn update_record_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: JsonBody<TransformRequest>,
) -> Result<Json<Record>> {
    let Json(req) = payload?;
    let kind = req.validate()?;
    let record = state
        .service
        .update_record(&id, kind, req.shift, &req.input)
        .await?;

    Ok(Json(record))
}

/// Handler for DELETE /records/:id
pub async fn delete_record_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service.delete_record(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /stats
///
/// Returns cache hit/miss statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.service.stats();
    Json(StatsResponse::new(&state.strategy, &stats))
}

// == Stateless Transforms ==

/// Handler for POST /reverse
///
/// Returns the reversed request body as plain text. Nothing is stored.
pub async fn reverse_handler(body: String) -> String {
    transform::reverse(&body)
}

/// Handler for POST /caesar?shift=N
pub async fn caesar_handler(Query(query): Query<ShiftQuery>, body: String) -> Result<String> {
    let shift = query.shift()?;
    Ok(transform::caesar(&body, shift))
}

/// Handler for POST /base64
pub async fn base64_handler(body: String) -> String {
    transform::base64(&body)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::store::{RecordStore, SqliteStore};

    async fn test_state() -> AppState {
        let store = SqliteStore::in_memory().await.unwrap();
        store.init_schema().await.unwrap();
        let strategy = CacheStrategy::Map;
        let service = RecordService::new(Arc::new(store), strategy.build());
        AppState::new(service, strategy)
    }

    fn request(kind: &str, shift: i32, input: &str) -> TransformRequest {
        TransformRequest {
            kind: kind.to_string(),
            shift,
            input: input.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_handler() {
        let state = test_state().await;

        let (status, Json(created)) =
            create_record_handler(State(state.clone()), Ok(Json(request("caesar", -3, "abc"))))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.result, "xyz");

        let Json(fetched) = get_record_handler(State(state), Path(created.id.clone()))
            .await
            .unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_invalid_request() {
        let state = test_state().await;

        let result =
            create_record_handler(State(state), Ok(Json(request("caesar", 0, "abc")))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_nonexistent_record() {
        let state = test_state().await;

        let result = get_record_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state().await;
        let (_, Json(created)) =
            create_record_handler(State(state.clone()), Ok(Json(request("reverse", 0, "abc"))))
                .await
                .unwrap();

        let status = delete_record_handler(State(state.clone()), Path(created.id.clone()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result = get_record_handler(State(state), Path(created.id)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state().await;

        let response = stats_handler(State(state)).await;
        assert_eq!(response.strategy, "map");
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
    }

    #[tokio::test]
    async fn test_stateless_transform_handlers() {
        assert_eq!(reverse_handler("123456789".to_string()).await, "987654321");
        assert_eq!(base64_handler("Man".to_string()).await, "TWFu");

        let query = ShiftQuery {
            shift: Some("-3".to_string()),
        };
        assert_eq!(
            caesar_handler(Query(query), "abc".to_string()).await.unwrap(),
            "xyz"
        );
    }

    #[tokio::test]
    async fn test_caesar_handler_requires_integer_shift() {
        for shift in [None, Some("two".to_string())] {
            let result = caesar_handler(Query(ShiftQuery { shift }), "abc".to_string()).await;
            assert!(matches!(result, Err(AppError::BadRequest(_))));
        }
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
