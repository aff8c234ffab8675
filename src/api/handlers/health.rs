//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{HealthChecks, HealthResponse, StorageCheck};
use crate::state::AppState;

/// Reports whether the storage backend answers queries.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Storage reachable
/// - **503 Service Unavailable**: Storage check failed
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "backend": "postgres", "message": "postgres, 12 accounts" }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = match state.account_service.count_accounts().await {
        Ok(count) => StorageCheck::ok(state.storage, count),
        Err(e) => {
            tracing::warn!(error = %e, backend = %state.storage, "Storage health check failed");
            StorageCheck::failed(state.storage, e)
        }
    };

    let response = HealthResponse::from_checks(HealthChecks { storage });
    let status = if response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
