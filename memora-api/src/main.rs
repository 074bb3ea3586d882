//! # Memora API Server
//!
//! This is the main API server for Memora, a small event reminder backend.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - Account endpoints (register, login)
//! - JWT-protected event CRUD endpoints scoped to the authenticated user
//! - A health check endpoint for load balancers
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=<at least 32 characters> cargo run -p memora-api
//! ```

use memora_api::{app, config::Config};
use memora_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memora_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Memora API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database pool and run migrations
    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;
    run_migrations(&pool).await?;

    // Build Axum application
    let bind_address = config.bind_address();
    let state = app::AppState::new(pool, config);
    let router = app::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Completes when the process receives Ctrl-C, letting in-flight requests
/// finish before the server exits.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received, exiting..."),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
    }
}
