//! tunecast - OBS-friendly now-playing overlay for Subsonic-compatible servers

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunecast::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "tunecast=debug,reqwest=debug"
    } else {
        "tunecast=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Some(Commands::Serve {
            env_file,
            host,
            port,
            refresh,
            show_progress,
            hide_progress,
            open,
        }) => {
            let progress = if show_progress {
                Some(true)
            } else if hide_progress {
                Some(false)
            } else {
                None
            };
            commands::serve(env_file, host, port, refresh, progress, open).await?;
        }
        Some(Commands::Setup { env_file }) => {
            commands::setup(env_file).await?;
        }
        Some(Commands::Completion { shell }) => {
            commands::completion(shell);
        }
        None => {
            commands::serve(None, None, None, None, None, false).await?;
        }
    }

    Ok(())
}
