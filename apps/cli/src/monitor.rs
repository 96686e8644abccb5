//! The `run` command: wire the real backends into the monitor loop.

use std::time::Duration;

use anyhow::Result;
use hushify_audio::platform::PlatformAudioSession;
use hushify_audio::{ProcessRegistry, SystemProcessRegistry};
use hushify_monitor::{AdMonitor, PollSettings};
use hushify_playback::{ProviderConfig, SpotifyClient};
use hushify_store::TokenStore;

pub async fn run(
    config: ProviderConfig,
    store: TokenStore,
    process_name: String,
    interval_ms: u64,
    duck_volume: f32,
) -> Result<()> {
    if store.load()?.is_none() {
        tracing::warn!("no stored credentials; run `hushify login` first");
    }

    let client = SpotifyClient::new(config, store);
    let registry = SystemProcessRegistry::new();
    if !registry.is_running(&process_name) {
        tracing::warn!(process = %process_name, "player process not running yet");
    }

    let mut monitor = AdMonitor::new(PlatformAudioSession::default(), process_name)
        .with_duck_volume(duck_volume);
    let settings = PollSettings {
        interval: Duration::from_millis(interval_ms),
        ..Default::default()
    };

    tracing::info!("monitoring playback, press Ctrl-C to stop");
    monitor
        .run(&client, &registry, settings, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("failed to listen for Ctrl-C: {err}");
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}
