//! Error taxonomy for Subsonic API calls

use thiserror::Error;

/// Failures surfaced by [`SubsonicClient`](super::SubsonicClient) calls.
///
/// Handlers convert these into user-visible HTTP behavior in one place; the
/// client and resolver only propagate.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the credentials (Subsonic error code 30).
    #[error("authentication failed: wrong username or password")]
    Auth,

    /// The server returned a named error that is neither a version mismatch
    /// nor an authentication failure.
    #[error("server error {code}: {message}")]
    Protocol { code: i64, message: String },

    /// No candidate protocol version was accepted during detection.
    #[error("could not auto-detect a compatible API version (tried {tried}); Navidrome usually supports 1.16.1")]
    VersionDetection { tried: String },

    /// Connection, timeout, or HTTP-level failure reaching the server.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("invalid JSON from server: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Short stable label used in client-facing error notes.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Auth => "AuthError",
            ApiError::Protocol { .. } => "ProtocolError",
            ApiError::VersionDetection { .. } => "VersionDetectionError",
            ApiError::Network(_) => "NetworkError",
            ApiError::Decode(_) => "DecodeError",
        }
    }
}
