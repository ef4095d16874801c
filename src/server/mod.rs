//! HTTP server for the overlay
//!
//! One stateless endpoint set over a shared read-only [`AppState`]; each
//! request talks to the backend independently, bounded by the configured
//! request timeout.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use colored::Colorize;
use tracing::{info, warn};

use crate::config::OverlayConfig;
use crate::subsonic::SubsonicClient;

pub mod html;
pub mod routes;

pub use routes::AppState;

/// Assemble the overlay router over shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/index.html", get(routes::index))
        .route("/api/now-playing", get(routes::now_playing))
        .route("/api/cover", get(routes::cover_art_missing))
        .route("/api/cover/", get(routes::cover_art_missing))
        .route("/api/cover/{id}", get(routes::cover_art))
        .route("/assets/{*path}", get(routes::asset))
        .fallback(routes::not_found)
        .with_state(state)
}

/// Bind the listener and serve until the process is stopped
pub async fn run(config: OverlayConfig, open_browser: bool) -> Result<()> {
    let client = SubsonicClient::new(config.connection_profile())
        .context("Failed to create Subsonic client")?;
    let state = Arc::new(AppState::new(config.clone(), client));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await.with_context(|| {
        format!(
            "Unable to start server on {} (another app may be using that port; \
             update OVERLAY_PORT in .env or rerun `tunecast setup`)",
            addr
        )
    })?;

    let overlay_url = format!("http://{}", addr);
    println!(
        "{} {} (refresh {}s)",
        "Overlay running:".green().bold(),
        overlay_url,
        config.refresh_seconds
    );
    println!("OBS Browser Source URL: {}", overlay_url);
    info!("Listening on {}", addr);

    if open_browser {
        let url = overlay_url.clone();
        tokio::spawn(async move {
            // Give the listener a moment before the browser hits it.
            tokio::time::sleep(Duration::from_millis(600)).await;
            if let Err(err) = open::that(&url) {
                warn!("Failed to open browser: {}", err);
            }
        });
    }

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
