use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

mod api;
mod config;
mod stream;

use config::{AppState, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "hubgate")]
#[command(about = "GitHub tool gateway with HTTP and SSE surfaces", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "hubgate.toml")]
    config: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// GitHub API base URL (overrides the configuration file)
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hubgate=info,tower_http=debug".into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let args = Args::parse();

    let token = args
        .github_token
        .filter(|t| !t.trim().is_empty())
        .context("GITHUB_TOKEN environment variable is required")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting hubgate");

    // Load configuration
    let mut config = ServerConfig::load(&args.config)?;
    if let Some(api_url) = args.api_url {
        config.github.api_url = api_url;
    }
    tracing::info!(api_url = %config.github.api_url, "GitHub token configured");

    let state = AppState::new(&config, token)?;

    // Start API server
    let addr = format!("{}:{}", args.host, args.port);
    tracing::info!("Starting API server on {}", addr);

    api::serve(&addr, state).await?;

    Ok(())
}
