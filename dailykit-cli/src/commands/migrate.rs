//! Schema command

use anyhow::Result;
use clap::Parser;

use super::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Apply the schema and exit. Safe to repeat.
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = args.db.connect().await?;
    pool.close().await;

    tracing::info!(database = %args.db.database_url, "schema up to date");
    println!("Schema up to date: {}", args.db.database_url);
    Ok(())
}
