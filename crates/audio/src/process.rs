//! Process discovery backed by `sysinfo`.

use std::sync::Mutex;

use sysinfo::{ProcessesToUpdate, System};

use crate::ProcessRegistry;

/// Cross-platform process registry.
///
/// Holds one `System` and refreshes its process table per query, so the
/// answer reflects the current state rather than the state at startup.
pub struct SystemProcessRegistry {
    system: Mutex<System>,
}

impl SystemProcessRegistry {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRegistry for SystemProcessRegistry {
    fn is_running(&self, process_name: &str) -> bool {
        let mut system = self.system.lock().expect("process registry mutex poisoned");
        system.refresh_processes(ProcessesToUpdate::All, true);
        system
            .processes()
            .values()
            .any(|process| process.name().eq_ignore_ascii_case(process_name))
    }
}
