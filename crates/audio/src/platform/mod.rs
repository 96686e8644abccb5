//! Platform backends for per-application audio sessions.
//!
//! Windows exposes per-process render sessions through WASAPI; other
//! platforms currently fall back to the inert backend (the monitor keeps
//! polling and logging, it just cannot touch the volume).

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::WasapiSessionControl as PlatformAudioSession;

#[cfg(not(windows))]
pub use crate::NullAudioSession as PlatformAudioSession;
