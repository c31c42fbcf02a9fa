//! Subcommands and the database options they share

use anyhow::{Context, Result};
use clap::Args;
use dailykit_server::db::pool::DEFAULT_MAX_CONNECTIONS;
use dailykit_server::db::{create_pool_with_options, migrations, SqlitePool};

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

/// Database connection options
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// SQLite database URL (the file is created if missing)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://dailykit.db")]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "DAILYKIT_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    /// Open the pool and bring the schema up to date.
    pub async fn connect(&self) -> Result<SqlitePool> {
        let pool = create_pool_with_options(&self.database_url, self.max_connections)
            .await
            .with_context(|| format!("Failed to open database {}", self.database_url))?;

        migrations::run(&pool)
            .await
            .context("Failed to apply database schema")?;

        Ok(pool)
    }
}
