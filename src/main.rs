use anyhow::Result;
use clap::Parser;
use sd_mcp::{config, server};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "sd-mcp", version, about = "Text-to-image MCP server over stdio")]
struct Cli {
    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Default assets location for calls that do not name one
    #[arg(long, visible_alias = "assets")]
    assets_dir: Option<String>,
    /// Directory for generated output files
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Enable debug diagnostics on stderr
    #[arg(long)]
    verbose: bool,
}

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging setup)
    let mut config = match config::load(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(assets_dir) = cli.assets_dir {
        config.server.assets_dir = assets_dir;
    }
    if let Some(output_dir) = cli.output_dir {
        config.server.output_dir = output_dir;
    }

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.server.logs.level.clone()
    };

    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    // stdout carries JSON-RPC; diagnostics go to stderr. RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .json()
        .init();

    info!("Starting sd-mcp with log level: {}", log_level);

    server::run(config).await?;

    Ok(())
}
