use crate::domain::{Book, CreateBookRequest};
use crate::transport::http::handlers::{books, health};
use crate::transport::http::middleware::with_middleware;
use crate::transport::http::response::{method_not_allowed, route_not_found};
use crate::transport::http::types::{AppState, ErrorResponse, HealthResponse};
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        books::create_book_handler,
        books::list_books_handler,
        books::get_book_handler,
        books::delete_book_handler
    ),
    components(schemas(Book, CreateBookRequest, ErrorResponse, HealthResponse))
)]
pub struct ApiDoc;

/// Routes with the middleware chain applied. Docs and CORS are layered on by the binary.
pub fn create_router(app_state: AppState) -> Router {
    let routes = Router::new()
        .route(
            "/health",
            get(health::healthcheck_handler).fallback(method_not_allowed),
        )
        .route(
            "/books",
            get(books::list_books_handler)
                .post(books::create_book_handler)
                .fallback(method_not_allowed),
        )
        .route(
            "/books/:id",
            get(books::get_book_handler)
                .delete(books::delete_book_handler)
                .fallback(method_not_allowed),
        )
        .fallback(route_not_found)
        .with_state(app_state);

    with_middleware(routes)
}
