//! Subsonic API HTTP client

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;
use super::models::*;

/// User-agent sent on every request to the backend
pub const USER_AGENT: &str = concat!("tunecast/", env!("CARGO_PKG_VERSION"));

/// Protocol versions tried during auto-detection, newest first.
///
/// The API requires a `v` parameter up front, but the supported version is
/// unknown until a server replies; incompatible versions return a named
/// error code, so walking a short candidate list is enough.
pub const DEFAULT_VERSION_CANDIDATES: &[&str] =
    &["1.16.1", "1.16.0", "1.15.0", "1.14.0", "1.13.0", "1.12.0"];

// Subsonic error codes vary by server, but these are typical:
// 20 = incompatible protocol version, 30 = wrong username or password.
const VERSION_MISMATCH_CODE: i64 = 20;
const AUTH_FAILURE_CODE: i64 = 30;

/// Immutable connection parameters for one Subsonic-compatible server.
///
/// Loaded once per process and shared read-only by every request handler.
#[derive(Debug, Clone)]
pub struct ConnectionProfile {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub client_name: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl ConnectionProfile {
    pub fn new(
        base_url: &str,
        username: &str,
        password: &str,
        client_name: &str,
        api_version: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            client_name: client_name.to_string(),
            api_version: api_version.to_string(),
            timeout,
        }
    }
}

/// HTTP client for the Subsonic REST API
#[derive(Clone)]
pub struct SubsonicClient {
    profile: ConnectionProfile,
    http_client: Client,
}

impl SubsonicClient {
    /// Create a new client bound to a connection profile
    pub fn new(profile: ConnectionProfile) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(profile.timeout)
            .build()?;

        Ok(Self {
            profile,
            http_client,
        })
    }

    pub fn profile(&self) -> &ConnectionProfile {
        &self.profile
    }

    /// Build a request URL with the shared authentication parameters
    ///
    /// Cover-art fetches must suppress `f=json`, since that endpoint returns
    /// binary data rather than a JSON envelope.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)], include_format: bool) -> String {
        let mut pairs: Vec<(&str, &str)> = vec![
            ("u", &self.profile.username),
            ("p", &self.profile.password),
            ("v", &self.profile.api_version),
            ("c", &self.profile.client_name),
        ];
        if include_format {
            pairs.push(("f", "json"));
        }
        pairs.extend_from_slice(params);
        rest_url(&self.profile.base_url, endpoint, &pairs)
    }

    /// GET a URL and decode the body as JSON
    ///
    /// Transport failures and HTTP error statuses map to `Network`; a body
    /// that is not valid JSON maps to `Decode`.
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, url: &str) -> Result<T, ApiError> {
        debug!("Fetching {}", endpoint);

        let response = self.http_client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Test connection and credentials against the server
    pub async fn ping(&self) -> Result<(), ApiError> {
        let url = self.build_url("ping", &[], true);
        let response: SubsonicResponse<serde_json::Value> = self.get_json("ping", &url).await?;

        let inner = response.subsonic_response;
        if inner.is_ok() {
            Ok(())
        } else {
            Err(error_from_response(inner.error))
        }
    }

    /// Fetch all now-playing entries
    ///
    /// A non-ok status or an empty result means "nothing is playing", which
    /// is a normal condition rather than a fault, so this never errors for
    /// backend-level failures.
    pub async fn now_playing_entries(&self) -> Result<Vec<TrackEntry>, ApiError> {
        let url = self.build_url("getNowPlaying", &[], true);
        let response: SubsonicResponse<NowPlayingData> =
            self.get_json("getNowPlaying", &url).await?;

        let inner = response.subsonic_response;
        if !inner.is_ok() {
            return Ok(Vec::new());
        }

        let entries = inner
            .data
            .map(|data| data.now_playing.entry)
            .unwrap_or_default();
        debug!("Found {} now-playing entries", entries.len());
        Ok(entries)
    }

    /// Fetch the current track from the persisted play queue
    ///
    /// Useful while paused: some clients stop reporting to getNowPlaying,
    /// but the play queue still knows the current track and position.
    pub async fn play_queue_current(&self) -> Result<PlayQueueCurrent, ApiError> {
        let url = self.build_url("getPlayQueue", &[], true);
        let response: SubsonicResponse<PlayQueueData> =
            self.get_json("getPlayQueue", &url).await?;

        let inner = response.subsonic_response;
        if !inner.is_ok() {
            return Ok(PlayQueueCurrent::default());
        }

        let queue = inner.data.map(|data| data.play_queue).unwrap_or_default();
        Ok(PlayQueueCurrent {
            entry: queue.current_entry().cloned(),
            position_seconds: queue.position,
        })
    }

    /// Download cover art bytes for the given id
    pub async fn cover_art(&self, cover_id: &str) -> Result<Bytes, ApiError> {
        let url = self.build_url("getCoverArt", &[("id", cover_id)], false);
        debug!("Fetching cover art {}", cover_id);

        let response = self.http_client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?)
    }
}

/// Detect the REST protocol version supported by the server.
///
/// Tries each candidate against `ping`, newest first. A version-mismatch
/// error moves on to the next candidate; an authentication failure aborts
/// immediately (further guessing is pointless); any other named error is
/// surfaced with the server's message. On success, returns the version the
/// server reports about itself, falling back to the accepted candidate.
pub async fn detect_api_version(
    base_url: &str,
    username: &str,
    password: &str,
    client_name: &str,
    timeout: Duration,
    candidates: &[&str],
) -> Result<String, ApiError> {
    let http_client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;

    for version in candidates {
        debug!("Trying API version {}", version);
        let url = rest_url(
            base_url,
            "ping",
            &[
                ("u", username),
                ("p", password),
                ("v", version),
                ("c", client_name),
                ("f", "json"),
            ],
        );

        let response = http_client.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let parsed: SubsonicResponse<serde_json::Value> = serde_json::from_str(&body)?;

        let inner = parsed.subsonic_response;
        if inner.is_ok() {
            return Ok(inner.version.unwrap_or_else(|| version.to_string()));
        }

        match inner.error {
            Some(error) if error.code == VERSION_MISMATCH_CODE => continue,
            error => return Err(error_from_response(error)),
        }
    }

    Err(ApiError::VersionDetection {
        tried: candidates.join(", "),
    })
}

fn error_from_response(error: Option<SubsonicError>) -> ApiError {
    match error {
        Some(error) if error.code == AUTH_FAILURE_CODE => ApiError::Auth,
        Some(error) => ApiError::Protocol {
            code: error.code,
            message: error.message,
        },
        None => ApiError::Protocol {
            code: 0,
            message: "unknown error".to_string(),
        },
    }
}

fn rest_url(base_url: &str, endpoint: &str, pairs: &[(&str, &str)]) -> String {
    let query: String = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}/rest/{}.view?{}",
        base_url.trim_end_matches('/'),
        endpoint,
        query
    )
}
