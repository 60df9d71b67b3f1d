//! Kapitler CLI entry point.

use anyhow::Result;
use clap::Parser;
use kapitler::cli::{commands, Cli, Commands};
use kapitler::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("kapitler={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match cli.command {
        Commands::Generate {
            video_url,
            chapters,
            temperature,
            max_tokens,
            min_gap,
            policy,
            lenient,
            raw,
            dump_prompt,
            model,
        } => {
            let args = commands::GenerateArgs {
                video_url,
                chapters,
                temperature,
                max_tokens,
                min_gap,
                policy,
                lenient,
                raw,
                dump_prompt,
                model,
            };
            commands::run_generate(args, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings)?;
        }
    }

    Ok(())
}
