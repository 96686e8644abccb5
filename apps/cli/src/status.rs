//! The `status` command: one poll, printed.

use anyhow::Result;
use hushify_playback::{ProviderConfig, SpotifyClient};
use hushify_store::TokenStore;

pub async fn run(config: ProviderConfig, store: TokenStore) -> Result<()> {
    let client = SpotifyClient::new(config, store);

    match client.poll().await {
        Some(snapshot) if snapshot.is_ad => println!("An advertisement is playing."),
        Some(snapshot) => println!("Now playing: {}", snapshot.describe()),
        None => println!("Nothing playing (or not authorized; run `hushify login`)."),
    }
    Ok(())
}
