/// Cadence - music player shell
use std::io;
use std::path::PathBuf;

use cadence_cli::{CliConfig, Session};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence Player in the terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Catalog JSON file (overrides the config file)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Session state file (overrides the config file)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog, or the tracks matching QUERY
    Tracks {
        /// Search text (title or artist)
        query: Option<String>,
    },
    /// Read player commands from stdin
    Shell,
    /// Show the restored session without playing anything
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(catalog) = cli.catalog {
        config.catalog_path = Some(catalog);
    }
    if let Some(state) = cli.state {
        config.state_path = state;
    }
    config.validate()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut session = Session::open(&config)?;

    match cli.command {
        Commands::Tracks { query } => {
            println!("{}", session.track_listing(query.as_deref().unwrap_or("")));
        }
        Commands::Shell => {
            tracing::info!("Starting shell");
            session.run(io::stdin().lock(), io::stdout().lock())?;
        }
        Commands::Status => {
            println!("{}", session.state_line());
        }
    }

    Ok(())
}
