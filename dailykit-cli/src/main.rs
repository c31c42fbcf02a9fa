//! dailykit: budgets, flashcards and a mood journal behind one RPC server

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::{LogFormat, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "dailykit",
    author,
    version,
    about = "Budgets, flashcards and a mood journal served over typed RPC",
    long_about = "Runs the dailykit RPC server on a SQLite database. Every procedure is \
                  POST /rpc/<name> with a JSON body. Settings can also come from the \
                  environment or a .env file."
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the RPC server (applies the schema first)
    Serve(commands::serve::ServeArgs),
    /// Create or upgrade the database schema and exit
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; real environment variables still apply
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        format: cli.log_format,
    })?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
    }
    Ok(())
}
