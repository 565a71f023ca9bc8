use std::sync::Arc;

use graphql_notes_server::{
    config,
    handlers::{self, graphql},
    repository::{MemoryRepository, NoteRepository, PostgresRepository},
    service::NoteService,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });

    // Repository creation and migration
    let repo: Arc<dyn NoteRepository> = match cfg.database_dsn.as_deref() {
        Some(dsn) => {
            let mut repo = PostgresRepository::new(dsn).await.unwrap_or_else(|e| {
                tracing::error!("Failed to establish database connection: {e}");
                panic!("failed to establish database connection: {e}");
            });

            repo.migrate().await.unwrap_or_else(|e| {
                tracing::error!("Failed to migrate database: {e}");
                panic!("failed to migrate database: {e}");
            });

            Arc::new(repo)
        }
        None => {
            tracing::warn!("No database DSN configured, notes are kept in memory only");
            Arc::new(MemoryRepository::new())
        }
    };

    // Service and schema creation
    let service = Arc::new(NoteService::new(repo));
    let schema = graphql::build_schema(service);
    let router = handlers::router(schema, cfg.graphiql);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind port {}: {e}", cfg.port);
            panic!("failed to bind port {}: {e}", cfg.port);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("GraphQL server starting, listening on {}", addr),
        Err(e) => tracing::warn!("Could not determine listening address: {e}"),
    }
    if cfg.graphiql {
        tracing::info!("GraphiQL explorer is served on GET /graphql");
    }

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    }

    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
