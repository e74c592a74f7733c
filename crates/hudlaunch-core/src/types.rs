use serde::{Deserialize, Serialize};

/// Snapshot of one process-table entry
///
/// Taken fresh on every query; never cached across polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub command: String,
    pub memory_mb: u64,
    pub memory_kb: u64,
}

impl ProcessInfo {
    pub fn new(pid: u32, name: String, command: String, memory_kb: u64) -> Self {
        Self {
            pid,
            name,
            command,
            memory_mb: memory_kb / 1024,
            memory_kb,
        }
    }
}

/// Run state of the target, recomputed on every poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    Running,
    Stopped,
}

impl ProcessState {
    pub fn is_running(self) -> bool {
        self == ProcessState::Running
    }

    // Action a single toggle button would offer in this state
    pub fn action_label(self) -> &'static str {
        match self {
            ProcessState::Running => "Stop",
            ProcessState::Stopped => "Start",
        }
    }
}

/// Outcome of a toggle action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    /// Target was stopped, now launched with this pid
    Started(u32),
    /// Target was running, now killed
    Stopped,
}

/// Watcher statistics
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct WatchStats {
    pub total_polls: u64,
    pub total_transitions: u64,
    pub total_starts: u64,
    pub total_kills: u64,
    pub last_poll_timestamp: u64,
}

impl WatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    // Record one poll of the process table
    pub fn record_poll(&mut self, timestamp: u64) {
        self.last_poll_timestamp = timestamp;
        self.total_polls += 1;
    }

    // Record an observed Running<->Stopped flip
    pub fn record_transition(&mut self) {
        self.total_transitions += 1;
    }

    // Record a launch issued by us
    pub fn record_start(&mut self) {
        self.total_starts += 1;
    }

    // Record a kill issued by us
    pub fn record_kill(&mut self) {
        self.total_kills += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== ProcessInfo Tests =====

    #[test]
    fn test_process_info_creation() {
        let proc = ProcessInfo::new(
            1234,
            "TurboHUD".to_string(),
            "/opt/hud/TurboHUD".to_string(),
            2048,
        );

        assert_eq!(proc.pid, 1234);
        assert_eq!(proc.name, "TurboHUD");
        assert_eq!(proc.command, "/opt/hud/TurboHUD");
        assert_eq!(proc.memory_kb, 2048);
        assert_eq!(proc.memory_mb, 2); // 2048 KB / 1024 = 2 MB
    }

    #[test]
    fn test_process_info_memory_conversion() {
        let proc = ProcessInfo::new(1, "t".to_string(), "cmd".to_string(), 1024);
        assert_eq!(proc.memory_mb, 1);

        let proc2 = ProcessInfo::new(1, "t".to_string(), "cmd".to_string(), 2560);
        assert_eq!(proc2.memory_mb, 2); // integer division
    }

    #[test]
    fn test_process_info_serialization() {
        let proc = ProcessInfo::new(
            1234,
            "TurboHUD".to_string(),
            "/opt/hud/TurboHUD".to_string(),
            2048,
        );

        let json = serde_json::to_string(&proc).expect("Failed to serialize");
        assert!(json.contains("\"pid\":1234"));
        assert!(json.contains("\"name\":\"TurboHUD\""));

        let deserialized: ProcessInfo = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(deserialized.pid, proc.pid);
        assert_eq!(deserialized.name, proc.name);
    }

    // ===== ProcessState Tests =====

    #[test]
    fn test_state_is_running() {
        assert!(ProcessState::Running.is_running());
        assert!(!ProcessState::Stopped.is_running());
    }

    #[test]
    fn test_state_action_label() {
        assert_eq!(ProcessState::Running.action_label(), "Stop");
        assert_eq!(ProcessState::Stopped.action_label(), "Start");
    }

    // ===== WatchStats Tests =====

    #[test]
    fn test_watch_stats_creation() {
        let stats = WatchStats::new();

        assert_eq!(stats.total_polls, 0);
        assert_eq!(stats.total_transitions, 0);
        assert_eq!(stats.total_starts, 0);
        assert_eq!(stats.total_kills, 0);
        assert_eq!(stats.last_poll_timestamp, 0);
    }

    #[test]
    fn test_record_poll() {
        let mut stats = WatchStats::new();

        stats.record_poll(1000);
        assert_eq!(stats.last_poll_timestamp, 1000);
        assert_eq!(stats.total_polls, 1);

        stats.record_poll(2000);
        assert_eq!(stats.last_poll_timestamp, 2000);
        assert_eq!(stats.total_polls, 2);
    }

    #[test]
    fn test_record_transition() {
        let mut stats = WatchStats::new();

        stats.record_transition();
        stats.record_transition();
        assert_eq!(stats.total_transitions, 2);
    }

    #[test]
    fn test_record_start_and_kill() {
        let mut stats = WatchStats::new();

        stats.record_start();
        assert_eq!(stats.total_starts, 1);

        stats.record_kill();
        stats.record_kill();
        assert_eq!(stats.total_kills, 2);
    }

    #[test]
    fn test_watch_stats_complete_workflow() {
        let mut stats = WatchStats::new();

        // Poll, target absent
        stats.record_poll(1000);
        // Launch it
        stats.record_start();
        // Poll again, observed the flip
        stats.record_poll(2000);
        stats.record_transition();
        // Kill it
        stats.record_kill();
        stats.record_poll(3000);
        stats.record_transition();

        assert_eq!(stats.total_polls, 3);
        assert_eq!(stats.total_transitions, 2);
        assert_eq!(stats.total_starts, 1);
        assert_eq!(stats.total_kills, 1);
        assert_eq!(stats.last_poll_timestamp, 3000);
    }

    #[test]
    fn test_watch_stats_serialization() {
        let mut stats = WatchStats::new();
        stats.record_poll(1000);
        stats.record_start();

        let json = serde_json::to_string(&stats).expect("Failed to serialize");
        assert!(json.contains("\"total_polls\":1"));
        assert!(json.contains("\"total_starts\":1"));

        let deserialized: WatchStats = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(deserialized.total_polls, stats.total_polls);
        assert_eq!(deserialized.total_starts, stats.total_starts);
    }
}
