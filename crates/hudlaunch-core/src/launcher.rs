use crate::{scanner::ProcessScanner, types::Toggled, Error, Result};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Launches and terminates the target process
pub struct ProcessLauncher {
    scanner: ProcessScanner,
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self {
            scanner: ProcessScanner::new(),
        }
    }

    /// Launch the executable at `path` and return the child pid.
    ///
    /// An empty path is refused before the OS is asked anything. A spawn
    /// failure (missing file, permission denied, malformed executable) is
    /// reported as a launch error; there is no retry.
    pub fn start(&self, path: &str) -> Result<u32> {
        if path.is_empty() {
            return Err(Error::Launch("executable path is not set".to_string()));
        }

        let child = Command::new(path)
            .spawn()
            .map_err(|e| Error::Launch(format!("cannot start process: {}", e)))?;

        let pid = child.id();
        info!("Launched {} (pid {})", path, pid);

        // Reap on exit so the child never lingers as a zombie in the
        // process table we poll. Run state stays poll-derived only.
        std::thread::spawn(move || {
            let mut child = child;
            let _ = child.wait();
            debug!("Child pid {} exited", pid);
        });

        Ok(pid)
    }

    /// Hard-kill the first process matching `name` exactly.
    ///
    /// Returns `Ok(false)` when nothing matched. SIGKILL, no grace period,
    /// no escalation.
    pub fn stop(&self, name: &str) -> Result<bool> {
        let process = match self.scanner.find(name)? {
            Some(p) => p,
            None => return Ok(false),
        };

        Self::kill_pid(process.pid)?;
        info!("Killed {} (pid {})", name, process.pid);
        Ok(true)
    }

    /// Stop the target if it is running, launch it otherwise.
    pub fn toggle(&self, name: &str, path: &str) -> Result<Toggled> {
        match self.scanner.find(name)? {
            Some(process) => {
                Self::kill_pid(process.pid)?;
                info!("Toggle: killed {} (pid {})", name, process.pid);
                Ok(Toggled::Stopped)
            }
            None => {
                let pid = self.start(path)?;
                Ok(Toggled::Started(pid))
            }
        }
    }

    /// Send SIGKILL to `pid`.
    fn kill_pid(pid: u32) -> Result<()> {
        let process_pid = Pid::from_raw(pid as i32);

        match kill(process_pid, Signal::SIGKILL) {
            Ok(_) => Ok(()),
            // Already gone between the query and the signal
            Err(nix::errno::Errno::ESRCH) => Ok(()),
            Err(e) => Err(Error::Terminate(format!(
                "failed to kill pid {}: {}",
                pid, e
            ))),
        }
    }

    /// Check if a pid exists
    ///
    /// Uses kill(pid, 0) - doesn't kill the process, only checks existence
    pub fn process_exists(pid: u32) -> Result<bool> {
        let process_pid = Pid::from_raw(pid as i32);

        match kill(process_pid, None) {
            Ok(_) => Ok(true),
            Err(nix::errno::Errno::ESRCH) => Ok(false),
            // No permission, but process exists
            Err(nix::errno::Errno::EPERM) => Ok(true),
            Err(e) => Err(Error::Query(format!(
                "failed to check pid {}: {}",
                pid, e
            ))),
        }
    }

    /// Look for an executable named after the target in `dir`.
    ///
    /// Fallback used when no path has been persisted yet: a file called
    /// `<target>` or `<target>.exe` sitting next to us counts.
    pub fn discover_in_dir(dir: &Path, target: &str) -> Option<PathBuf> {
        let exe_name = format!("{}.exe", target);

        let entries = std::fs::read_dir(dir).ok()?;
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if (file_name == target || file_name == exe_name.as_str())
                && entry.path().is_file()
            {
                return Some(entry.path());
            }
        }

        None
    }
}

impl Default for ProcessLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launcher_creation() {
        let _launcher = ProcessLauncher::new();
    }

    #[test]
    fn test_start_empty_path_is_refused() {
        let launcher = ProcessLauncher::new();
        let result = launcher.start("");

        assert!(result.is_err());
        if let Err(e) = result {
            let msg = format!("{}", e);
            assert!(msg.contains("executable path is not set"));
        }
    }

    #[test]
    fn test_start_nonexistent_path_is_launch_error() {
        let launcher = ProcessLauncher::new();
        let result = launcher.start("/no/such/binary/hudlaunch-test-xyz");

        assert!(result.is_err());
        if let Err(e) = result {
            let msg = format!("{}", e);
            assert!(msg.contains("cannot start process"));
        }
    }

    #[test]
    fn test_stop_unknown_name_returns_false() {
        let launcher = ProcessLauncher::new();
        let stopped = launcher.stop("hudlaunch-no-such-process-xyz123").unwrap();
        assert!(!stopped);
    }

    #[test]
    fn test_process_exists_invalid_pid() {
        // PID 999999 most likely doesn't exist
        let exists = ProcessLauncher::process_exists(999999).unwrap_or(true);
        assert!(!exists);
    }

    #[test]
    fn test_process_exists_init_process() {
        // PID 1 (init/systemd) always exists
        let exists = ProcessLauncher::process_exists(1).unwrap_or(false);
        assert!(exists);
    }

    #[test]
    fn test_discover_in_dir_finds_target_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("TurboHUD.exe"), b"").unwrap();

        let found = ProcessLauncher::discover_in_dir(dir.path(), "TurboHUD");
        assert_eq!(found, Some(dir.path().join("TurboHUD.exe")));
    }

    #[test]
    fn test_discover_in_dir_finds_bare_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("TurboHUD"), b"").unwrap();

        let found = ProcessLauncher::discover_in_dir(dir.path(), "TurboHUD");
        assert_eq!(found, Some(dir.path().join("TurboHUD")));
    }

    #[test]
    fn test_discover_in_dir_none_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("SomethingElse"), b"").unwrap();

        let found = ProcessLauncher::discover_in_dir(dir.path(), "TurboHUD");
        assert!(found.is_none());
    }

    #[test]
    fn test_discover_in_dir_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("TurboHUD")).unwrap();

        let found = ProcessLauncher::discover_in_dir(dir.path(), "TurboHUD");
        assert!(found.is_none());
    }
}
