//! HTTP server command

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;

use dailykit_server::http::{run_server, ServerConfig};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind to
    #[arg(long, env = "DAILYKIT_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let pool = args.db.connect().await?;

    let config = ServerConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
        cors_permissive: args.cors_permissive,
    };
    tracing::info!(database = %args.db.database_url, "Starting dailykit server on {}", config.bind_addr);

    // Blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
