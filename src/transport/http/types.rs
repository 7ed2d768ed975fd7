use crate::app::{BookRepository, SqliteBookRepository};
use crate::storage::SqliteStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared by every handler. All mutable state lives behind the repository and the store.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn BookRepository>,
    pub store: SqliteStore,
}

impl AppState {
    /// Wires the SQLite repository over `store`.
    pub fn new(store: SqliteStore) -> Self {
        Self {
            repository: Arc::new(SqliteBookRepository::new(store.clone())),
            store,
        }
    }
}

/// The only error body the API returns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
