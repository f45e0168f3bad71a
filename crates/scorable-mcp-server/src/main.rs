use anyhow::{Context, Result};
use clap::Parser;
use scorable_mcp_server::{logging, ServerArgs, StdioServer, ToolRouter};
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerArgs::parse().into_config()?;
    logging::init(&config.log_level, config.log_format)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        api_url = %config.client.base_url,
        "starting Scorable MCP server"
    );

    let router = ToolRouter::new(&config).context("failed to initialise tool router")?;
    StdioServer::new(router)
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("stdio transport failed")?;

    Ok(())
}
