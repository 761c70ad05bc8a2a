mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vocab-cli", about = "Vocab Hero database tools", version)]
struct Cli {
    /// Use a specific database file (default: the server's default)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database and its schema
    Init,

    /// Create a user account
    UserAdd {
        email: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Import vocabulary from a CSV file (word,reading,meaning[,partOfSpeech])
    Import {
        /// Owner's email
        email: String,
        csv: PathBuf,
    },

    /// List vocabulary due for review
    Due {
        email: String,
        /// Maximum items shown
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show progress statistics
    Stats { email: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::open(cli.database)?;

    match cli.command {
        Command::Init => commands::init::run(&app, &cli.format)?,
        Command::UserAdd { email, name } => {
            commands::users::run_add(&app, &email, name, &cli.format)?;
        }
        Command::Import { email, csv } => {
            commands::import::run(&app, &email, &csv, &cli.format, use_color)?;
        }
        Command::Due { email, limit } => {
            commands::due::run(&app, &email, limit, &cli.format, use_color)?;
        }
        Command::Stats { email } => commands::stats::run(&app, &email, &cli.format, use_color)?,
    }

    Ok(())
}
