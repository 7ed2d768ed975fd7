use crate::domain::{validate_create_book, CreateBookRequest};
use crate::transport::http::response::{
    write_empty, write_json, ApiError, MSG_INVALID_ID, MSG_INVALID_JSON,
};
use crate::transport::http::types::AppState;
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;

/// Path ids are signed 64-bit integers; anything else, including a segment that is not valid
/// percent-encoded UTF-8, is a client error.
fn parse_id(raw: Result<Path<String>, PathRejection>) -> Result<i64, ApiError> {
    let Path(raw) = raw?;
    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidInput(MSG_INVALID_ID.to_string()))
}

/// The body is decoded regardless of `Content-Type`; only malformed JSON is rejected.
fn decode_create_request(body: &[u8]) -> Result<CreateBookRequest, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(reason = %e, "rejected request body");
        ApiError::InvalidInput(MSG_INVALID_JSON.to_string())
    })
}

#[utoipa::path(
    post,
    path = "/books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = crate::domain::Book),
        (status = 400, description = "Invalid JSON body or validation failure", body = crate::transport::http::types::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::transport::http::types::ErrorResponse)
    )
)]
pub async fn create_book_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = decode_create_request(&body)?;
    validate_create_book(&request)?;

    let book = state
        .repository
        .create(&request)
        .await
        .map_err(|e| ApiError::from_repository(e, "failed to create book"))?;
    tracing::info!(id = book.id, "book created");
    Ok(write_json(StatusCode::CREATED, book))
}

#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "All books in ascending id order", body = Vec<crate::domain::Book>),
        (status = 500, description = "Internal server error", body = crate::transport::http::types::ErrorResponse)
    )
)]
pub async fn list_books_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let books = state
        .repository
        .all()
        .await
        .map_err(|e| ApiError::from_repository(e, "failed to list books"))?;
    Ok(write_json(StatusCode::OK, books))
}

#[utoipa::path(
    get,
    path = "/books/{id}",
    params(
        ("id" = i64, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "The book", body = crate::domain::Book),
        (status = 400, description = "Id is not an integer", body = crate::transport::http::types::ErrorResponse),
        (status = 404, description = "No book with this id", body = crate::transport::http::types::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::transport::http::types::ErrorResponse)
    )
)]
pub async fn get_book_handler(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = parse_id(raw_id)?;
    let book = state
        .repository
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "failed to fetch book"))?;
    Ok(write_json(StatusCode::OK, book))
}

#[utoipa::path(
    delete,
    path = "/books/{id}",
    params(
        ("id" = i64, Path, description = "Book id")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Id is not an integer", body = crate::transport::http::types::ErrorResponse),
        (status = 404, description = "No book with this id", body = crate::transport::http::types::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::transport::http::types::ErrorResponse)
    )
)]
pub async fn delete_book_handler(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = parse_id(raw_id)?;
    state
        .repository
        .delete(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "failed to delete book"))?;
    tracing::info!(id, "book deleted");
    Ok(write_empty(StatusCode::NO_CONTENT))
}
