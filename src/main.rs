mod config;
mod context;
mod pr;
mod server;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::pr::GitHubClient;
use crate::server::PrContextServer;

/// Pull Request Context MCP Server — serves GitHub pull request metadata and
/// diffs to MCP clients over stdio.
#[derive(Parser, Debug)]
#[command(name = "pr-context-mcp", version, about)]
struct Cli {
    /// Config file path (defaults to .pr-context.toml in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol; logs go to stderr only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        error!(error = %err, "fatal error");
        return Err(err);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load(cli.config.as_deref())?;
    debug!(
        api_url = config.api_url(),
        diff_url = config.diff_url(),
        authenticated = config.github_token().is_some(),
        "loaded configuration"
    );

    let client = GitHubClient::new(&config);
    let service = PrContextServer::new(Arc::new(client)).serve(stdio()).await?;
    info!("Pull Request Context MCP Server running on stdio");

    service.waiting().await?;
    debug!("client disconnected, shutting down");
    Ok(())
}
