//! Request handlers for the overlay endpoints
//!
//! This is the single place where backend failures turn into user-visible
//! HTTP behavior: `/api/now-playing` always answers 200 with a degraded
//! payload so the embedded browser source never breaks, while cover art is
//! allowed to fail with HTTP statuses because `<img>` handles those.

use std::path::{Component, Path as StdPath, PathBuf};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tracing::warn;

use crate::config::OverlayConfig;
use crate::overlay::{build_now_playing_payload, resolve_playback, NowPlayingPayload};
use crate::subsonic::SubsonicClient;

use super::html;

/// Cover art for a stable id never changes, unlike now-playing state.
const COVER_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

const ASSETS_DIR: &str = "assets";

/// Shared, read-only state for all request handlers
pub struct AppState {
    pub client: SubsonicClient,
    pub config: OverlayConfig,
    index_html: String,
}

impl AppState {
    pub fn new(config: OverlayConfig, client: SubsonicClient) -> Self {
        let index_html = html::render_index(&config);
        Self {
            client,
            config,
            index_html,
        }
    }
}

/// GET `/` and `/index.html`
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(state.index_html.clone()),
    )
        .into_response()
}

/// GET `/api/now-playing`
///
/// Always 200: failures are folded into the payload so the overlay degrades
/// to "nothing playing" with an error note and recovers on the next poll.
pub async fn now_playing(State(state): State<Arc<AppState>>) -> Response {
    let payload = match resolve_playback(&state.client).await {
        Ok(resolved) => build_now_playing_payload(
            resolved.entry.as_ref(),
            resolved.is_paused,
            resolved.position_seconds,
        ),
        Err(err) => {
            warn!("Failed to fetch now playing: {}", err);
            NowPlayingPayload::unreachable(format!("Unable to reach Navidrome ({})", err.kind()))
        }
    };

    ([(header::CACHE_CONTROL, "no-store")], Json(payload)).into_response()
}

/// GET `/api/cover/{id}`
///
/// Proxies cover art so backend credentials stay server-side. Supports
/// conditional requests via a deterministic ETag; a match answers 304
/// without touching the backend at all.
pub async fn cover_art(
    State(state): State<Arc<AppState>>,
    Path(cover_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if cover_id.is_empty() {
        return (StatusCode::BAD_REQUEST, "Cover art ID missing").into_response();
    }

    let etag = cover_etag(&cover_id);
    if client_has_cover(&headers, &etag) {
        return (
            StatusCode::NOT_MODIFIED,
            [
                (header::ETAG, etag),
                (header::CACHE_CONTROL, COVER_CACHE_CONTROL.to_string()),
            ],
        )
            .into_response();
    }

    match state.client.cover_art(&cover_id).await {
        Ok(bytes) if bytes.is_empty() => {
            (StatusCode::NOT_FOUND, "Cover art unavailable").into_response()
        }
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "image/jpeg".to_string()),
                (header::ETAG, etag),
                (header::CACHE_CONTROL, COVER_CACHE_CONTROL.to_string()),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => {
            warn!("Failed to fetch cover art {}: {}", cover_id, err);
            (
                StatusCode::BAD_GATEWAY,
                format!("Unable to fetch cover art ({})", err.kind()),
            )
                .into_response()
        }
    }
}

/// GET `/api/cover` with no id
pub async fn cover_art_missing() -> Response {
    (StatusCode::BAD_REQUEST, "Cover art ID missing").into_response()
}

/// GET `/assets/{path}`
pub async fn asset(Path(asset_path): Path<String>) -> Response {
    serve_asset(StdPath::new(ASSETS_DIR), &asset_path)
}

/// Fallback for unknown paths
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Endpoint not found").into_response()
}

fn cover_etag(cover_id: &str) -> String {
    format!("\"cover-{}\"", cover_id)
}

fn client_has_cover(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(',').any(|candidate| candidate.trim() == etag))
        .unwrap_or(false)
}

/// Serve one file from the assets directory, rejecting path traversal.
fn serve_asset(root: &StdPath, requested: &str) -> Response {
    let trimmed = requested.trim_start_matches(['/', '\\']);

    // Reject any upward component before touching the filesystem.
    let relative = PathBuf::from(trimmed);
    if relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_)))
    {
        return (StatusCode::BAD_REQUEST, "Invalid asset path").into_response();
    }

    let candidate = root.join(&relative);
    match std::fs::read(&candidate) {
        Ok(data) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, guess_content_type(trimmed))],
            data,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Asset not found").into_response(),
    }
}

fn guess_content_type(path: &str) -> &'static str {
    let lowered = path.to_lowercase();
    if lowered.ends_with(".png") {
        "image/png"
    } else if lowered.ends_with(".jpg") || lowered.ends_with(".jpeg") {
        "image/jpeg"
    } else if lowered.ends_with(".gif") {
        "image/gif"
    } else if lowered.ends_with(".webp") {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_etag_is_deterministic() {
        assert_eq!(cover_etag("al-123"), "\"cover-al-123\"");
    }

    #[test]
    fn test_if_none_match_accepts_lists() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::IF_NONE_MATCH,
            "\"cover-xyz\", \"cover-abc\"".parse().unwrap(),
        );
        assert!(client_has_cover(&headers, "\"cover-abc\""));
        assert!(!client_has_cover(&headers, "\"cover-def\""));
    }

    #[test]
    fn test_traversal_components_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.png"), b"png").unwrap();

        let response = serve_asset(dir.path(), "../etc/passwd");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = serve_asset(dir.path(), "logo.png");
        assert_eq!(response.status(), StatusCode::OK);

        let response = serve_asset(dir.path(), "missing.png");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_content_type_guessing() {
        assert_eq!(guess_content_type("Cover.PNG"), "image/png");
        assert_eq!(guess_content_type("a.jpeg"), "image/jpeg");
        assert_eq!(guess_content_type("a.webp"), "image/webp");
        assert_eq!(guess_content_type("a.bin"), "application/octet-stream");
    }
}
