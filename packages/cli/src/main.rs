// ABOUTME: Schoolgate server entry point
// ABOUTME: Parses CLI flags, loads .env configuration, starts the HTTP server

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use schoolgate_cli::{run_server, Config};

#[derive(Parser, Debug)]
#[command(name = "schoolgate", about = "School admission and enrollment server")]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database path (overrides SCHOOLGATE_DB_PATH)
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database {
        config.db_path = database;
    }

    run_server(config).await
}
