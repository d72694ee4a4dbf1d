use std::panic;
use std::sync::Arc;
use std::time::Duration;

use coscribe::build_router;
use coscribe::config::Config;
use coscribe::state::AppState;
use coscribe::store::{MemoryStore, PgDocumentStore, SharedStore};
use coscribe::sync::flush::FlushScheduler;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info level, but allow debug for our app
            "coscribe=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });

    // Durable document store: PostgreSQL when configured
    let store: SharedStore = match &config.db_url {
        Some(db_url) => match PgDocumentStore::connect(db_url).await {
            Ok(store) => {
                info!("Database initialized successfully");
                Arc::new(store)
            }
            Err(e) => {
                error!("Failed to initialize database: {}", e);
                warn!("Falling back to in-memory document store");
                Arc::new(MemoryStore::new())
            }
        },
        None => {
            warn!("No database URL configured - documents will not survive restarts");
            Arc::new(MemoryStore::new())
        }
    };

    if config.jwt_secret.is_none() {
        warn!("No JWT secret configured - connections presenting a token will be rejected");
    }

    let state = AppState::new(config.clone(), store);

    // Background persistence of dirty documents
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let flusher = FlushScheduler::new(
        state.cache.clone(),
        state.store.clone(),
        Duration::from_secs(state.config.flush_interval_secs),
    );
    let flush_task = tokio::spawn(flusher.run(shutdown_rx));

    let app_routes = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", config.server_address()));

    info!("Server running on http://{}", config.server_address());
    info!("Editor WebSocket available at ws://{}/editor/:doc_id", config.server_address());
    info!("Swagger UI available at http://{}/swagger", config.server_address());

    axum::serve(listener, app_routes)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed to start");

    // Drain dirty documents once more before exit
    let _ = shutdown_tx.send(true);
    if let Err(e) = flush_task.await {
        error!("Flush scheduler task failed: {}", e);
    }
    info!("Shutdown complete");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
