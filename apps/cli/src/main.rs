//! hushify: ducks the player's volume while ads play.

mod login;
mod monitor;
mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hushify_playback::ProviderConfig;
use hushify_store::TokenStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hushify", version, about = "Duck the player volume while ads play")]
struct Cli {
    /// Credential file location.
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authorize with the provider and seed the credential store.
    Login,
    /// Monitor playback and duck the session volume during ads.
    Run {
        /// Image name of the player process.
        #[arg(long, default_value = "Spotify.exe")]
        process_name: String,
        /// Poll cadence in milliseconds.
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
        /// Volume fraction to duck to during ads.
        #[arg(long, default_value_t = hushify_monitor::DEFAULT_DUCK_VOLUME)]
        duck_volume: f32,
    },
    /// Print the current playback snapshot once.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hushify=debug")),
        )
        .init();

    let cli = Cli::parse();
    let store = TokenStore::new(
        cli.token_file
            .unwrap_or_else(TokenStore::default_path),
    );
    let config = provider_config_from_env()?;

    match cli.command {
        Command::Login => login::run(&config, &store).await,
        Command::Run {
            process_name,
            interval_ms,
            duck_volume,
        } => monitor::run(config, store, process_name, interval_ms, duck_volume).await,
        Command::Status => status::run(config, store).await,
    }
}

fn provider_config_from_env() -> Result<ProviderConfig> {
    let client_id =
        std::env::var("SPOTIFY_CLIENT_ID").context("SPOTIFY_CLIENT_ID is not set")?;
    let client_secret =
        std::env::var("SPOTIFY_CLIENT_SECRET").context("SPOTIFY_CLIENT_SECRET is not set")?;

    let mut config = ProviderConfig::new(client_id, client_secret);
    if let Ok(redirect_uri) = std::env::var("SPOTIFY_REDIRECT_URI") {
        config.redirect_uri = redirect_uri;
    }
    Ok(config)
}
