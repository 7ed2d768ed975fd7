#![allow(dead_code)]

use bookshelf_service::transport;
use bookshelf_service::SqliteStore;

/// Spin up the HTTP server over a fresh in-memory store on an OS-assigned port,
/// returning the base URL and the store.
pub async fn spawn_test_server() -> (String, SqliteStore) {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = transport::http::create_router(transport::http::AppState::new(store.clone()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://127.0.0.1:{}", port), store)
}
