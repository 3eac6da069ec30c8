//! scriptsync CLI entry point.

use anyhow::Result;
use clap::Parser;
use scriptsync::cli::{commands, Cli, Commands};
use scriptsync::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("scriptsync={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    // Execute command
    match &cli.command {
        Commands::Align {
            script,
            transcript,
            output,
            format,
            transcript_format,
        } => {
            commands::run_align(
                script,
                transcript,
                output.clone(),
                format.as_deref(),
                transcript_format.as_deref(),
                settings,
            )?;
        }

        Commands::Batch { manifest, jobs } => {
            commands::run_batch(manifest, *jobs, settings).await?;
        }

        Commands::Score { a, b } => {
            commands::run_score(a, b, &settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path, settings)?;
        }
    }

    Ok(())
}
