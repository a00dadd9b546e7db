mod discover;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cafeswipe")]
#[command(about = "Swipe through nearby cafés and keep the ones you like")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch nearby cafés and review them one at a time
    Discover {
        /// Latitude of the search center
        #[arg(long, env = "CAFESWIPE_LAT", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude of the search center
        #[arg(long, env = "CAFESWIPE_LNG", allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// Print the saved list
    Saved {
        /// Print the card markup instead of plain text
        #[arg(long)]
        html: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = cafeswipe_core::load_client_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Discover { lat, lng } => {
            let location = discover::location_from_args(lat, lng)?;
            discover::run_discover(&config, location).await?;
        }
        Commands::Saved { html } => discover::run_saved(&config, html)?,
    }

    Ok(())
}
