//! CLI command handlers

use std::path::PathBuf;

use anyhow::Result;
use clap::CommandFactory;

use crate::config::{self, ConfigOverrides, DEFAULT_ENV_FILE};
use crate::server;

use super::setup;
use super::Cli;

/// Start the overlay server.
///
/// When configuration is missing and the terminal is interactive, falls
/// through to the guided setup instead of failing cold.
pub async fn serve(
    env_file: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    refresh: Option<u32>,
    show_progress: Option<bool>,
    open_browser: bool,
) -> Result<()> {
    let env_path = env_file.unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
    let overrides = ConfigOverrides {
        host,
        port,
        refresh,
        show_progress,
    };

    let config = match config::load_config(&env_path, &overrides) {
        Ok(config) => config,
        Err(err) if console::user_attended() => {
            println!("{}", err);
            println!("\nStarting guided setup…\n");
            setup::run_setup(&env_path).await?;
            config::load_config(&env_path, &overrides)?
        }
        Err(err) => return Err(err),
    };

    server::run(config, open_browser).await
}

/// Run the guided setup only
pub async fn setup(env_file: Option<PathBuf>) -> Result<()> {
    let env_path = env_file.unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
    setup::run_setup(&env_path).await
}

/// Print shell completions to stdout
pub fn completion(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
