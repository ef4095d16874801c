//! Guided configuration setup
//!
//! Prompts for connection and display settings, verifies them against the
//! server (including protocol version auto-detection), and writes the `.env`
//! file consumed by [`config::load_config`].

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, Input, Password, Select};
use tracing::info;

use crate::config::{self, DEFAULT_CLIENT_NAME};
use crate::subsonic::{detect_api_version, DEFAULT_VERSION_CANDIDATES};

const PLACEHOLDER_CHOICES: &[&str] = &["dark", "light", "off"];

/// Interactively create or update the `.env` file at `env_path`
pub async fn run_setup(env_path: &Path) -> Result<()> {
    let existing = config::load_env_file(env_path)?;
    let get = |key: &str| existing.get(key).cloned().unwrap_or_default();

    println!("{}", "tunecast setup".bold());
    println!("Values are written to {}\n", env_path.display());

    let url: String = Input::new()
        .with_prompt("Navidrome URL (e.g. https://music.example.com)")
        .with_initial_text(get("NAVIDROME_URL"))
        .interact_text()
        .context("Failed to read URL")?;
    let url = url.trim().trim_end_matches('/').to_string();

    let username: String = Input::new()
        .with_prompt("Username")
        .with_initial_text(get("NAVIDROME_USER"))
        .interact_text()
        .context("Failed to read username")?;

    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")?;

    println!("\nChecking connection…");
    let version = detect_api_version(
        &url,
        &username,
        &password,
        DEFAULT_CLIENT_NAME,
        Duration::from_secs(6),
        DEFAULT_VERSION_CANDIDATES,
    )
    .await
    .context("Could not verify the connection")?;
    println!("{} API version {}\n", "Connected.".green(), version);
    info!("Verified {} as {} (API {})", url, username, version);

    let host: String = Input::new()
        .with_prompt("Overlay host")
        .default("127.0.0.1".to_string())
        .with_initial_text(get("OVERLAY_HOST"))
        .interact_text()
        .context("Failed to read host")?;

    let port: u16 = Input::new()
        .with_prompt("Overlay port")
        .default(8080)
        .interact_text()
        .context("Failed to read port")?;

    let refresh: u32 = Input::new()
        .with_prompt("Refresh interval (seconds)")
        .default(1)
        .interact_text()
        .context("Failed to read refresh interval")?;

    let show_progress = Confirm::new()
        .with_prompt("Show progress bar and elapsed time?")
        .default(false)
        .interact()
        .context("Failed to read progress choice")?;

    let placeholder = Select::new()
        .with_prompt("Placeholder cover while nothing is playing")
        .items(PLACEHOLDER_CHOICES)
        .default(0)
        .interact()
        .context("Failed to read placeholder choice")?;

    let mut values: HashMap<String, String> = existing;
    values.insert("NAVIDROME_URL".to_string(), url);
    values.insert("NAVIDROME_USER".to_string(), username);
    values.insert("NAVIDROME_PASSWORD".to_string(), password);
    values.insert("NAVIDROME_API_VERSION".to_string(), version);
    values.insert("OVERLAY_HOST".to_string(), host);
    values.insert("OVERLAY_PORT".to_string(), port.to_string());
    values.insert("OVERLAY_REFRESH_SECONDS".to_string(), refresh.to_string());
    values.insert(
        "OVERLAY_SHOW_PROGRESS".to_string(),
        show_progress.to_string(),
    );
    values.insert(
        "OVERLAY_NOTHING_PLAYING_PLACEHOLDER".to_string(),
        PLACEHOLDER_CHOICES[placeholder].to_string(),
    );

    config::write_env_file(env_path, &values)?;
    println!("\n{} {}", "Wrote".green(), env_path.display());

    Ok(())
}
