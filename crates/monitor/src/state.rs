//! Volume-ducking state machine.

use hushify_audio::AudioSessionControl;
use hushify_playback::PlaybackSnapshot;

/// Fraction of full volume to duck to while an ad plays.
pub const DEFAULT_DUCK_VOLUME: f32 = 0.05;

/// Where the monitored session's volume currently stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeState {
    /// Normal playback; the session volume is untouched.
    Normal,
    /// An ad is playing and the session has been ducked. `original` is
    /// the level sampled at the ad edge, `None` when the session could
    /// not be found at that moment.
    Ducked { original: Option<f32> },
}

/// The ad-detection state machine.
///
/// Owns the volume state for one player process. The original volume is
/// sampled exactly once per ad edge, so repeated ad frames cannot capture
/// an already-ducked level, and restoration targets the sampled level
/// rather than a fixed "full volume".
pub struct AdMonitor<A> {
    audio: A,
    process_name: String,
    duck_volume: f32,
    state: VolumeState,
    last_logged_track: Option<String>,
}

impl<A: AudioSessionControl> AdMonitor<A> {
    pub fn new(audio: A, process_name: impl Into<String>) -> Self {
        Self {
            audio,
            process_name: process_name.into(),
            duck_volume: DEFAULT_DUCK_VOLUME,
            state: VolumeState::Normal,
            last_logged_track: None,
        }
    }

    pub fn with_duck_volume(mut self, duck_volume: f32) -> Self {
        self.duck_volume = duck_volume.clamp(0.0, 1.0);
        self
    }

    pub fn state(&self) -> &VolumeState {
        &self.state
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    /// Feed one poll result through the state machine.
    ///
    /// `None` leaves the state untouched: a poll that yielded nothing is
    /// not evidence the ad ended, so the ducked level stays put until a
    /// real snapshot says otherwise.
    pub fn observe(&mut self, snapshot: Option<&PlaybackSnapshot>) {
        let Some(snapshot) = snapshot else {
            return;
        };
        if snapshot.is_ad {
            self.on_ad();
        } else {
            self.on_track(snapshot);
        }
    }

    fn on_ad(&mut self) {
        if matches!(self.state, VolumeState::Ducked { .. }) {
            // Repeated ad frames: already ducked, never re-sample.
            return;
        }

        let original = self.audio.volume(&self.process_name);
        if original.is_none() {
            tracing::warn!(process = %self.process_name, "no audio session to duck");
        }
        if !self.audio.set_volume(&self.process_name, self.duck_volume) {
            tracing::warn!(process = %self.process_name, "could not lower session volume");
        }

        tracing::info!(
            original = ?original,
            ducked_to = self.duck_volume,
            "ad started, session ducked"
        );
        self.state = VolumeState::Ducked { original };
        self.last_logged_track = None;
    }

    fn on_track(&mut self, snapshot: &PlaybackSnapshot) {
        if let VolumeState::Ducked { original } = self.state {
            match original {
                Some(level) => {
                    if !self.audio.set_volume(&self.process_name, level) {
                        tracing::warn!(level, "could not restore session volume");
                    }
                    tracing::info!(level, "ad over, session volume restored");
                }
                // Session was absent at the ad edge; nothing to restore.
                None => tracing::info!("ad over, no recorded volume to restore"),
            }
            self.state = VolumeState::Normal;
        }

        let track = snapshot.describe();
        if self.last_logged_track.as_deref() != Some(track.as_str()) {
            tracing::info!(now_playing = %track);
            self.last_logged_track = Some(track);
        }
    }
}
