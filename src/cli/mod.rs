//! CLI module for tunecast

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod setup;

#[derive(Parser, Debug)]
#[command(
    name = "tunecast",
    about = "Serve an OBS-friendly now-playing overlay for Subsonic-compatible servers"
)]
#[command(version, author)]
pub struct Cli {
    /// Running without a subcommand starts the server
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the overlay server (default)
    Serve {
        /// Path to a .env file (defaults to .env in the working directory)
        #[arg(long, value_name = "PATH")]
        env_file: Option<PathBuf>,

        /// Override overlay host (OVERLAY_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Override overlay port (OVERLAY_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Override refresh interval seconds (OVERLAY_REFRESH_SECONDS)
        #[arg(long)]
        refresh: Option<u32>,

        /// Show progress bar + time
        #[arg(long, conflicts_with = "hide_progress")]
        show_progress: bool,

        /// Hide progress bar + time
        #[arg(long)]
        hide_progress: bool,

        /// Open the overlay page in your default browser after starting
        #[arg(long)]
        open: bool,
    },

    /// Guided setup: create or update the .env configuration
    Setup {
        /// Path to the .env file to write
        #[arg(long, value_name = "PATH")]
        env_file: Option<PathBuf>,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
