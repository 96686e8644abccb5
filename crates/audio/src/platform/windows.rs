//! WASAPI render-session backend.
//!
//! Walks the default render device's audio sessions, matches the owning
//! process image name, and reads or writes that session's
//! `ISimpleAudioVolume`. COM is initialized apartment-threaded for the
//! duration of each operation; the session interfaces are not cached, so
//! a player restart is picked up on the next call.

use windows::core::{Interface, PWSTR};
use windows::Win32::Foundation::CloseHandle;
use windows::Win32::Media::Audio::{
    eConsole, eRender, IAudioSessionControl2, IAudioSessionManager2, IMMDeviceEnumerator,
    ISimpleAudioVolume, MMDeviceEnumerator,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_ALL, COINIT_APARTMENTTHREADED,
};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_FORMAT,
    PROCESS_QUERY_LIMITED_INFORMATION,
};

use crate::AudioSessionControl;

#[derive(Debug, Default)]
pub struct WasapiSessionControl;

impl WasapiSessionControl {
    pub fn new() -> Self {
        Self
    }

    fn with_session<T>(
        &self,
        process_name: &str,
        op: impl FnOnce(&ISimpleAudioVolume) -> windows::core::Result<T>,
    ) -> Option<T> {
        unsafe {
            let _ = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
            let result = match find_session(process_name) {
                Some(volume) => match op(&volume) {
                    Ok(value) => Some(value),
                    Err(err) => {
                        tracing::debug!(process = process_name, "session volume call failed: {err}");
                        None
                    }
                },
                None => None,
            };
            CoUninitialize();
            result
        }
    }
}

impl AudioSessionControl for WasapiSessionControl {
    fn volume(&self, process_name: &str) -> Option<f32> {
        self.with_session(process_name, |volume| unsafe { volume.GetMasterVolume() })
    }

    fn set_volume(&self, process_name: &str, level: f32) -> bool {
        let level = level.clamp(0.0, 1.0);
        self.with_session(process_name, |volume| unsafe {
            volume.SetMasterVolume(level, std::ptr::null())
        })
        .is_some()
    }
}

/// Locate the render session owned by a process with the given image name.
unsafe fn find_session(process_name: &str) -> Option<ISimpleAudioVolume> {
    let enumerator: IMMDeviceEnumerator =
        CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL).ok()?;
    let device = enumerator.GetDefaultAudioEndpoint(eRender, eConsole).ok()?;
    let manager: IAudioSessionManager2 = device.Activate(CLSCTX_ALL, None).ok()?;
    let sessions = manager.GetSessionEnumerator().ok()?;
    let count = sessions.GetCount().ok()?;

    for index in 0..count {
        let Ok(session) = sessions.GetSession(index) else {
            continue;
        };
        let Ok(control) = session.cast::<IAudioSessionControl2>() else {
            continue;
        };
        let Ok(process_id) = control.GetProcessId() else {
            continue;
        };
        if process_id == 0 {
            // The system sounds session has no owning process.
            continue;
        }
        let Ok(image_name) = process_image_name(process_id) else {
            continue;
        };
        if image_name.eq_ignore_ascii_case(process_name) {
            return session.cast::<ISimpleAudioVolume>().ok();
        }
    }

    None
}

/// Image name (file name only) of the process owning a session.
unsafe fn process_image_name(process_id: u32) -> windows::core::Result<String> {
    let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, process_id)?;

    let mut buffer = vec![0u16; 260];
    let mut size = buffer.len() as u32;
    let result = QueryFullProcessImageNameW(
        handle,
        PROCESS_NAME_FORMAT(0),
        PWSTR(buffer.as_mut_ptr()),
        &mut size,
    );
    let _ = CloseHandle(handle);
    result?;

    let path = String::from_utf16_lossy(&buffer[..size as usize]);
    Ok(path
        .rsplit('\\')
        .next()
        .unwrap_or(path.as_str())
        .to_string())
}
