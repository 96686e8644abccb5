//! Ad-detection monitor.
//!
//! Consumes playback snapshots and drives the player's audio session
//! through a two-state machine: duck the volume when an ad starts,
//! restore the pre-ad level when normal playback resumes. The state
//! machine ([`AdMonitor::observe`]) is plain synchronous code; the
//! polling loop around it ([`AdMonitor::run`]) owns the cadence and the
//! shutdown signal.

mod poller;
mod state;

pub use poller::{PollSettings, DEFAULT_POLL_INTERVAL, NO_DATA_BACKOFF};
pub use state::{AdMonitor, VolumeState, DEFAULT_DUCK_VOLUME};
