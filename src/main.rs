use std::sync::Arc;

use notes_api::{app, config, repository::Repository, service::NoteService};

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to locate or load config: {e}");
    });
    tracing::info!("Successfully loaded notes API config");

    // Repository creation and migration
    let mut repo = Repository::new(&cfg.database_dsn).await.unwrap_or_else(|e| {
        tracing::error!("Failed to establish database connection: {e}");
        panic!("failed to establish database connection: {e}");
    });

    repo.migrate().await.unwrap_or_else(|e| {
        tracing::error!("Failed to migrate database: {e}");
        panic!("failed to migrate database: {e}");
    });

    // Service creation
    let service = Arc::new(NoteService::new(Arc::new(repo)));

    let router = app::router(service, &cfg.cors_origins);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind port {}: {e}", cfg.port);
            panic!("failed to bind port {}: {e}", cfg.port);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("REST server starting, listening on {}", addr),
        Err(e) => tracing::warn!("Could not read listener address: {e}"),
    }

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    }
}
