//! The middleware chain wrapped around the router, outermost first:
//! panic containment, request logging, then the routes themselves.

use crate::transport::http::response::{write_error, MSG_INTERNAL};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

/// Records method and path before dispatch. Leaves the response untouched.
pub async fn log_request(request: Request, next: Next) -> Response {
    tracing::info!(
        method = %request.method(),
        path = %request.uri().path(),
        "request received"
    );
    next.run(request).await
}

/// Converts a panic that escaped a handler into a generic 500.
pub fn contain_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    tracing::error!(panic = detail, "handler panicked");
    write_error(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
}

pub fn with_middleware(router: Router) -> Router {
    router
        .layer(middleware::from_fn(log_request))
        .layer(CatchPanicLayer::custom(contain_panic))
}
