//! Labyrinth Engine - authoritative server for the browser dungeon crawler
//!
//! The engine is the only holder of game state:
//! - Serves the renderer over WebSocket at `/ws`
//! - Persists saves and the leaderboard (SQLite or in-memory)
//! - Submits player reviews to an external document store when configured

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labyrinth_engine::api::websocket::ws_handler;
use labyrinth_engine::infrastructure::config::AppConfig;
use labyrinth_engine::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "labyrinth_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Labyrinth Engine");

    let config = AppConfig::from_env();
    tracing::info!("Configuration loaded");
    tracing::info!("  Port: {}", config.server_port);
    tracing::info!(
        "  Persistence: {}",
        config.database_path.as_deref().unwrap_or("in-memory")
    );
    tracing::info!(
        "  Review endpoint: {}",
        config.review_endpoint.as_deref().unwrap_or("unconfigured")
    );

    let server_port = config.server_port;
    let state = Arc::new(AppState::new(config).await?);
    tracing::info!("Application state initialized");

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(ws_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
