//! Polling loop around the state machine.

use std::future::Future;
use std::time::Duration;

use hushify_audio::{AudioSessionControl, ProcessRegistry};
use hushify_playback::PlaybackSource;

use crate::state::AdMonitor;

/// Cadence while snapshots are flowing.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Back-off after a poll that yielded nothing.
pub const NO_DATA_BACKOFF: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub no_data_backoff: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            no_data_backoff: NO_DATA_BACKOFF,
        }
    }
}

impl<A: AudioSessionControl> AdMonitor<A> {
    /// Poll `source` at a fixed cadence until `shutdown` resolves.
    ///
    /// Shutdown is honored between iterations, never mid-call. A poll
    /// that yields nothing only stretches the pause before the next
    /// attempt; nothing inside an iteration can end the loop.
    pub async fn run<P, R, F>(
        &mut self,
        source: &P,
        registry: &R,
        settings: PollSettings,
        shutdown: F,
    ) where
        P: PlaybackSource,
        R: ProcessRegistry,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut process_was_running = true;

        loop {
            let snapshot = source.poll().await;

            if snapshot.is_none() {
                // Hint at the likely cause, once per outage.
                let running = registry.is_running(self.process_name());
                if !running && process_was_running {
                    tracing::warn!(process = %self.process_name(), "player process not running");
                }
                process_was_running = running;
            }

            self.observe(snapshot.as_ref());

            let pause = if snapshot.is_some() {
                settings.interval
            } else {
                settings.no_data_backoff
            };

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested, monitor stopping");
                    return;
                }
                _ = tokio::time::sleep(pause) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::VolumeState;
    use hushify_playback::PlaybackSnapshot;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Plays back a fixed poll script, then reports nothing.
    struct ScriptedSource {
        script: Mutex<VecDeque<Option<PlaybackSnapshot>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Option<PlaybackSnapshot>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }
    }

    #[async_trait::async_trait]
    impl PlaybackSource for ScriptedSource {
        async fn poll(&self) -> Option<PlaybackSnapshot> {
            self.script.lock().unwrap().pop_front().flatten()
        }
    }

    struct NeverRunning;

    impl ProcessRegistry for NeverRunning {
        fn is_running(&self, _process_name: &str) -> bool {
            false
        }
    }

    struct FixedSession;

    impl AudioSessionControl for FixedSession {
        fn volume(&self, _process_name: &str) -> Option<f32> {
            Some(0.5)
        }

        fn set_volume(&self, _process_name: &str, _level: f32) -> bool {
            true
        }
    }

    fn ad() -> Option<PlaybackSnapshot> {
        Some(PlaybackSnapshot {
            is_ad: true,
            title: None,
            artists: Vec::new(),
            duration_ms: 0,
            progress_ms: 0,
            track_id: None,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn loop_observes_and_stops_on_shutdown() {
        let source = ScriptedSource::new(vec![ad(), None, None]);
        let mut monitor = AdMonitor::new(FixedSession, "player.exe");
        let settings = PollSettings {
            interval: Duration::from_millis(10),
            no_data_backoff: Duration::from_millis(20),
        };

        monitor
            .run(
                &source,
                &NeverRunning,
                settings,
                tokio::time::sleep(Duration::from_millis(100)),
            )
            .await;

        // The ad frame was consumed and NoData afterwards left it ducked.
        assert_eq!(
            monitor.state(),
            &VolumeState::Ducked {
                original: Some(0.5)
            }
        );
        assert!(source.script.lock().unwrap().is_empty());
    }
}
