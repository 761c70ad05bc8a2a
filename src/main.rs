use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use vocab_hero_lib::api;
use vocab_hero_lib::config::Config;

#[derive(Parser)]
#[command(name = "vocab-hero", about = "Vocabulary learning API server", version)]
struct Args {
    /// TOML config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Override the database file
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }

    api::serve(config).await.context("Server failed")?;
    Ok(())
}
