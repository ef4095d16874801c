//! Subsonic API client module

pub mod client;
pub mod error;
pub mod models;

pub use client::{
    detect_api_version, ConnectionProfile, SubsonicClient, DEFAULT_VERSION_CANDIDATES,
};
pub use error::ApiError;
pub use models::*;
