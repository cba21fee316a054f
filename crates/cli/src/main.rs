//! Air Quality Index CLI
//!
//! Predicts AQI through a running server, and classifies scores and lists
//! the category bands locally.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{bands, health, predict};

/// Air Quality Index CLI
#[derive(Parser)]
#[command(name = "aqi")]
#[command(author, version, about = "CLI for the Air Quality Index predictor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via AQI_API_URL env var or ~/.config/aqi/config.json)
    #[arg(long, env = "AQI_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict the AQI for a set of pollutant concentrations
    Predict(predict::PredictArgs),

    /// Classify an AQI score into its category
    Classify {
        /// AQI score
        #[arg(allow_negative_numbers = true)]
        score: f64,
    },

    /// List the AQI category bands
    Bands,

    /// Show server health and readiness
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Predict(args) => {
            let client = connect(cli.api_url.as_deref())?;
            predict::predict(&client, &args, cli.format).await?;
        }
        Commands::Classify { score } => {
            bands::classify_score(score, cli.format)?;
        }
        Commands::Bands => {
            bands::show_bands(cli.format)?;
        }
        Commands::Health => {
            let client = connect(cli.api_url.as_deref())?;
            health::show_health(&client, cli.format).await?;
        }
    }

    Ok(())
}

fn connect(api_url: Option<&str>) -> Result<client::ApiClient> {
    let config = config::Config::load()?;
    client::ApiClient::new(&config.resolve_api_url(api_url), config.timeout())
}
