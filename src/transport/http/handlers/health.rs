use crate::transport::http::response::{write_error, write_json};
use crate::transport::http::types::{AppState, HealthResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (store reachable)", body = HealthResponse),
        (status = 503, description = "Service is unhealthy (store unreachable)", body = crate::transport::http::types::ErrorResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => write_json(
            StatusCode::OK,
            HealthResponse {
                status: "ok".to_string(),
            },
        ),
        Err(e) => {
            tracing::warn!(error = %e, "store ping failed");
            write_error(StatusCode::SERVICE_UNAVAILABLE, "database unreachable")
        }
    }
}
