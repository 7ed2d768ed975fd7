// src/bin/api_server.rs

use anyhow::Context;
use bookshelf_service::infra::{shutdown, telemetry};
use bookshelf_service::transport;
use bookshelf_service::{DrainOutcome, Settings, ShutdownController, SqliteStore};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let settings = Settings::from_env().context("invalid configuration")?;

    // --- Store Initialization ---
    tracing::info!(database_url = %settings.database_url, "opening store");
    let store = SqliteStore::open(&settings.database_url)
        .await
        .context("failed to open store")?;

    // --- API Server Initialization ---
    let app_state = transport::http::AppState::new(store.clone());
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);

    let listener = match tokio::net::TcpListener::bind(settings.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            store.close().await;
            return Err(e).with_context(|| format!("failed to bind {}", settings.bind_addr));
        }
    };
    tracing::info!(addr = %settings.bind_addr, "server listening");
    tracing::info!("Swagger UI available at /swagger-ui");

    // --- Graceful shutdown ---
    let controller = ShutdownController::new();
    tokio::spawn(shutdown::listen_for_signals(controller.clone()));

    let outcome = shutdown::serve(listener, app, controller, settings.shutdown_timeout).await;

    // Released exactly once, whatever the drain outcome. Connections still held by abandoned
    // requests would block `close`, so the release is bounded by the same deadline.
    if store.close_within(settings.shutdown_timeout).await {
        tracing::info!("store released");
    } else {
        tracing::warn!(
            timeout_ms = settings.shutdown_timeout.as_millis() as u64,
            "store release timed out with connections still checked out"
        );
    }

    match outcome.context("server error")? {
        DrainOutcome::Completed => tracing::info!("graceful shutdown complete"),
        DrainOutcome::TimedOut => tracing::warn!("shutdown forced after drain deadline"),
    }
    Ok(())
}
