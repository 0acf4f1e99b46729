// ABOUTME: Server assembly for the Schoolgate binary
// ABOUTME: Opens the database, builds the router with CORS and tracing, serves it

pub mod config;

use anyhow::Context;
use axum::http::Method;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use schoolgate_api::AppState;

pub use config::{Config, ConfigError};

/// Run the HTTP server until shutdown.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let state = AppState::init(&config.db_path, config.defaults.clone(), &config.jwt_secret)
        .await
        .with_context(|| format!("opening database at {}", config.db_path.display()))?;

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<axum::http::HeaderValue>()
                .context("parsing CORS_ORIGIN")?,
        )
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = schoolgate_api::create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!(%addr, "Schoolgate server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
