use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "consulta")]
#[command(version, about = "Unified taxpayer and vehicle lookup (SRI + ANT)")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use the offline mock registries instead of the live services
    #[arg(long, global = true)]
    pub mock: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive three-stage lookup
    Lookup,
    /// Run the full verification chain non-interactively
    Query {
        /// Contact email for the verification attempt
        #[arg(long)]
        email: String,
        /// Taxpayer RUC (natural person)
        #[arg(long)]
        ruc: String,
        /// Vehicle plate
        #[arg(long)]
        plate: String,
    },
    /// List completed lookups
    History,
    /// Clear the lookup history
    Reset {
        #[arg(long)]
        force: bool,
    },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a default consulta.toml to the project directory
    Init,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "consulta=debug" } else { "consulta=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let config = consulta::config::Config::new(project_dir, cli.verbose, cli.mock)?;

    match &cli.command {
        Commands::Lookup => cmd::cmd_lookup(&config).await?,
        Commands::Query { email, ruc, plate } => {
            cmd::cmd_query(&config, email, ruc, plate).await?
        }
        Commands::History => cmd::cmd_history(&config)?,
        Commands::Reset { force } => cmd::cmd_reset(&config, *force)?,
        Commands::Config { command } => cmd::cmd_config(&config, command.clone())?,
    }

    Ok(())
}
