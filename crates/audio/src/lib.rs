//! Per-application audio session control and process discovery.
//!
//! The monitor only needs two capabilities from the operating system:
//! read/write access to one application's audio session volume, and an
//! answer to "is that application running". Both are trait seams here so
//! the state machine can be exercised against test doubles, with the real
//! backends living in [`platform`].

mod process;

pub mod platform;

pub use process::SystemProcessRegistry;

/// Control over one application's per-process audio session.
///
/// Volumes are fractions in `[0.0, 1.0]`, matching what the OS mixer
/// exposes for the session.
pub trait AudioSessionControl: Send + Sync {
    /// Current session volume, or `None` when the process has no active
    /// audio session (not running, or not playing through the mixer).
    fn volume(&self, process_name: &str) -> Option<f32>;

    /// Set the session volume, clamped to `[0.0, 1.0]`.
    ///
    /// Returns `false` when the process has no active audio session; the
    /// caller decides whether that matters.
    fn set_volume(&self, process_name: &str, level: f32) -> bool;
}

/// Answers whether a process with the given image name is running.
pub trait ProcessRegistry: Send + Sync {
    fn is_running(&self, process_name: &str) -> bool;
}

/// Inert session control for tests and platforms without a backend.
#[derive(Debug, Default)]
pub struct NullAudioSession;

impl AudioSessionControl for NullAudioSession {
    fn volume(&self, _process_name: &str) -> Option<f32> {
        None
    }

    fn set_volume(&self, _process_name: &str, _level: f32) -> bool {
        false
    }
}
