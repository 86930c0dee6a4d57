//! Smart money engine - wallet scoring and spot/perp confluence alerts
//!
//! Alerts are informational. Suggested setups are derived mechanically from
//! a reference price and are not trading advice.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::error;

// Use the library crate
use smartmoney::cli::commands;
use smartmoney::config::{Config, LoggingConfig};

/// Smart money engine - wallet tiers and confluence alerts
#[derive(Parser)]
#[command(name = "smartmoney")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the processing cycle loop
    Run {
        /// Run a single cycle and exit
        #[arg(long)]
        once: bool,

        /// Use the built-in mock event source
        #[arg(long)]
        mock: bool,

        /// Event batch file, or a directory of batch files
        #[arg(long, value_name = "PATH")]
        events: Option<String>,
    },

    /// Show current configuration
    Config,

    /// Score a wallet from its metrics
    Score {
        /// All-time ROI as a fraction (0.5 = 50%)
        #[arg(long, allow_hyphen_values = true)]
        roi: Option<f64>,

        /// Account value in USD
        #[arg(long)]
        equity: Option<f64>,

        /// All-time PnL in USD
        #[arg(long, allow_hyphen_values = true)]
        pnl: Option<f64>,
    },

    /// Import wallets from a leaderboard JSON snapshot
    Discover {
        /// Leaderboard JSON file
        #[arg(long)]
        file: PathBuf,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration before tracing so the logging section applies
    let config = Config::load(&cli.config);
    init_tracing(
        &config
            .as_ref()
            .map(|c| c.logging.clone())
            .unwrap_or_default(),
    );

    let config = match config {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Run { once, mock, events } => {
            commands::run(config, Path::new(&cli.config), once, mock, events).await
        }
        Commands::Config => commands::show_config(&config),
        Commands::Score { roi, equity, pnl } => commands::score(roi, equity, pnl),
        Commands::Discover { file } => commands::discover(&config, &file).await,
    };

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
