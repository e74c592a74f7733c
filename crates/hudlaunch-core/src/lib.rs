//! hudlaunch Core Library
//!
//! Core library for hudlaunch - remembers the path of one target executable,
//! starts and stops it, and answers "is it running right now" from the OS
//! process table.

pub mod error;
pub mod launcher;
pub mod properties;
pub mod scanner;
pub mod types;

pub use error::{Error, Result};
pub use launcher::ProcessLauncher;
pub use properties::Properties;
pub use scanner::ProcessScanner;
pub use types::{ProcessInfo, ProcessState, Toggled, WatchStats};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config key holding the absolute path of the target executable.
pub const KEY_HUD_PATH: &str = "HUD_PATH";

/// Config key overriding the process name to look for.
pub const KEY_TARGET_NAME: &str = "TARGET_NAME";

/// Config key overriding the poll interval in milliseconds.
pub const KEY_POLL_INTERVAL_MS: &str = "POLL_INTERVAL_MS";

/// Process name the watcher looks for when the config does not override it.
pub const DEFAULT_TARGET_NAME: &str = "TurboHUD";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_keys() {
        assert_eq!(KEY_HUD_PATH, "HUD_PATH");
        assert_eq!(DEFAULT_TARGET_NAME, "TurboHUD");
    }
}
