//! Overlay configuration
//!
//! Values come from process environment variables or a local `.env` file in
//! simple KEY=VALUE form, with CLI overrides taking precedence over both.
//! The file keeps credentials out of source control and shell history.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::subsonic::ConnectionProfile;

pub mod theme;

pub use theme::OverlayTheme;

/// Default `.env` location, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Client identifier reported to the backend
pub const DEFAULT_CLIENT_NAME: &str = "tunecast";

const DEFAULT_API_VERSION: &str = "1.16.1";
const DEFAULT_TIMEOUT_SECONDS: f64 = 6.0;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REFRESH_SECONDS: u32 = 1;

/// Stable ordering for keys written to the `.env` file
const ENV_KEY_ORDER: &[&str] = &[
    "NAVIDROME_URL",
    "NAVIDROME_USER",
    "NAVIDROME_PASSWORD",
    "NAVIDROME_CLIENT_NAME",
    "NAVIDROME_API_VERSION",
    "NAVIDROME_TIMEOUT",
    "OVERLAY_HOST",
    "OVERLAY_PORT",
    "OVERLAY_REFRESH_SECONDS",
    "OVERLAY_SHOW_PROGRESS",
    "OVERLAY_NOTHING_PLAYING_PLACEHOLDER",
    "OVERLAY_THEME_FONT_FAMILY",
    "OVERLAY_THEME_TEXT_COLOR",
    "OVERLAY_THEME_MUTED_OPACITY",
    "OVERLAY_THEME_CARD_BG",
    "OVERLAY_THEME_CARD_RADIUS_PX",
    "OVERLAY_THEME_CARD_SHADOW",
    "OVERLAY_THEME_CARD_MIN_WIDTH_PX",
    "OVERLAY_THEME_CARD_GAP_PX",
    "OVERLAY_THEME_CARD_PADDING_Y_PX",
    "OVERLAY_THEME_CARD_PADDING_X_PX",
    "OVERLAY_THEME_COVER_SIZE_PX",
    "OVERLAY_THEME_COVER_RADIUS_PX",
    "OVERLAY_THEME_TITLE_SIZE_PX",
    "OVERLAY_THEME_ARTIST_SIZE_PX",
    "OVERLAY_THEME_TIME_SIZE_PX",
    "OVERLAY_THEME_PROGRESS_TRACK_BG",
    "OVERLAY_THEME_PROGRESS_HEIGHT_PX",
    "OVERLAY_THEME_ACCENT_START",
    "OVERLAY_THEME_ACCENT_END",
];

/// Behavior of the cover slot while nothing is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderMode {
    Dark,
    Light,
    Off,
}

impl PlaceholderMode {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "none" | "off" | "false" | "0" => PlaceholderMode::Off,
            "light" => PlaceholderMode::Light,
            _ => PlaceholderMode::Dark,
        }
    }

    /// URL of the placeholder cover asset, if one is enabled
    pub fn asset_url(&self) -> Option<String> {
        let name = match self {
            PlaceholderMode::Dark => "Nothing Playing Dark.png",
            PlaceholderMode::Light => "Nothing Playing Light.png",
            PlaceholderMode::Off => return None,
        };
        Some(format!("/assets/{}", urlencoding::encode(name)))
    }
}

/// Resolved configuration for one server process.
///
/// Immutable after load; every request handler reads it through a shared
/// reference.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    pub navidrome_url: String,
    pub navidrome_user: String,
    pub navidrome_password: String,
    pub navidrome_client: String,
    pub navidrome_version: String,
    pub request_timeout: Duration,
    pub server_host: String,
    pub server_port: u16,
    pub refresh_seconds: u32,
    pub show_progress: bool,
    pub nothing_playing_placeholder: PlaceholderMode,
    pub theme: OverlayTheme,
}

impl OverlayConfig {
    /// Connection parameters handed to the Subsonic client
    pub fn connection_profile(&self) -> ConnectionProfile {
        ConnectionProfile::new(
            &self.navidrome_url,
            &self.navidrome_user,
            &self.navidrome_password,
            &self.navidrome_client,
            &self.navidrome_version,
            self.request_timeout,
        )
    }
}

/// CLI flags that take precedence over environment and file values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub refresh: Option<u32>,
    pub show_progress: Option<bool>,
}

/// Read a `.env` file, ignoring comments, blank lines, and lines without `=`
pub fn load_env_file(env_path: &Path) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();
    if !env_path.exists() {
        debug!("No env file at {:?}, using environment only", env_path);
        return Ok(values);
    }

    let contents = fs::read_to_string(env_path)
        .with_context(|| format!("Failed to read env file {:?}", env_path))?;

    for raw_line in contents.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let cleaned = value.trim().trim_matches('"').trim_matches('\'');
        values.insert(key.trim().to_string(), cleaned.to_string());
    }

    debug!("Loaded {} values from {:?}", values.len(), env_path);
    Ok(values)
}

/// Write a `.env` file with known keys first, in a stable order
pub fn write_env_file(env_path: &Path, values: &HashMap<String, String>) -> Result<()> {
    let mut lines: Vec<String> = vec![
        "# tunecast configuration".to_string(),
        "# Read automatically on startup; do not commit credentials".to_string(),
        String::new(),
    ];

    for key in ENV_KEY_ORDER {
        if let Some(value) = values.get(*key) {
            lines.push(format!("{}={}", key, value));
        }
    }
    let mut extras: Vec<&String> = values
        .keys()
        .filter(|key| !ENV_KEY_ORDER.contains(&key.as_str()))
        .collect();
    extras.sort();
    for key in extras {
        lines.push(format!("{}={}", key, values[key]));
    }

    let contents = format!("{}\n", lines.join("\n").trim_end());
    fs::write(env_path, contents)
        .with_context(|| format!("Failed to write env file {:?}", env_path))?;

    debug!("Wrote {} values to {:?}", values.len(), env_path);
    Ok(())
}

/// Load configuration with the documented precedence:
/// CLI overrides > process environment > `.env` file > defaults.
pub fn load_config(env_path: &Path, overrides: &ConfigOverrides) -> Result<OverlayConfig> {
    let file_values = load_env_file(env_path)?;
    load_config_from(|name| std::env::var(name).ok(), &file_values, overrides)
}

fn load_config_from(
    env: impl Fn(&str) -> Option<String>,
    file_values: &HashMap<String, String>,
    overrides: &ConfigOverrides,
) -> Result<OverlayConfig> {
    let pick = |name: &str| -> Option<String> {
        env(name).or_else(|| file_values.get(name).cloned())
    };

    let navidrome_url = pick("NAVIDROME_URL")
        .unwrap_or_default()
        .trim_end_matches('/')
        .to_string();
    let navidrome_user = pick("NAVIDROME_USER").unwrap_or_default();
    let navidrome_password = pick("NAVIDROME_PASSWORD").unwrap_or_default();

    if navidrome_url.is_empty() || navidrome_user.is_empty() || navidrome_password.is_empty() {
        anyhow::bail!(
            "Missing configuration: NAVIDROME_URL, NAVIDROME_USER, and NAVIDROME_PASSWORD must be set.\n\
             Run `tunecast setup` (or create a .env file in the working directory)."
        );
    }

    let placeholder = pick("OVERLAY_NOTHING_PLAYING_PLACEHOLDER")
        .map(|raw| PlaceholderMode::parse(&raw))
        .unwrap_or(PlaceholderMode::Dark);

    let theme = OverlayTheme::resolve(pick);

    Ok(OverlayConfig {
        navidrome_url,
        navidrome_user,
        navidrome_password,
        navidrome_client: pick("NAVIDROME_CLIENT_NAME")
            .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string()),
        navidrome_version: pick("NAVIDROME_API_VERSION")
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        request_timeout: Duration::from_secs_f64(
            as_f64(pick("NAVIDROME_TIMEOUT"), DEFAULT_TIMEOUT_SECONDS).max(0.0),
        ),
        server_host: overrides
            .host
            .clone()
            .or_else(|| pick("OVERLAY_HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        server_port: overrides
            .port
            .unwrap_or_else(|| as_i64(pick("OVERLAY_PORT"), i64::from(DEFAULT_PORT)) as u16),
        refresh_seconds: overrides.refresh.unwrap_or_else(|| {
            as_i64(
                pick("OVERLAY_REFRESH_SECONDS"),
                i64::from(DEFAULT_REFRESH_SECONDS),
            )
            .max(1) as u32
        }),
        show_progress: overrides
            .show_progress
            .unwrap_or_else(|| as_bool(pick("OVERLAY_SHOW_PROGRESS"), false)),
        nothing_playing_placeholder: placeholder,
        theme,
    })
}

pub(crate) fn as_i64(value: Option<String>, default: i64) -> i64 {
    value
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

pub(crate) fn as_f64(value: Option<String>, default: f64) -> f64 {
    value
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .unwrap_or(default)
}

fn as_bool(value: Option<String>, default: bool) -> bool {
    match value {
        Some(raw) => matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        None => default,
    }
}
