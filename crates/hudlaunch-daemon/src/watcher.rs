use hudlaunch_core::{ProcessScanner, ProcessState, Result, WatchStats};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Polling watcher for the target process
///
/// Each `check()` re-queries the OS process table; the poll result is the
/// sole source of truth for run state. The watcher never caches a handle to
/// the target between polls.
pub struct Watcher {
    scanner: ProcessScanner,
    target_name: String,
    last_state: Option<ProcessState>,
    stats: WatchStats,
}

impl Watcher {
    pub fn new(target_name: &str) -> Self {
        Self {
            scanner: ProcessScanner::new(),
            target_name: target_name.to_string(),
            last_state: None,
            stats: WatchStats::new(),
        }
    }

    /// Get current UNIX timestamp in seconds
    fn current_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Perform one poll of the process table.
    ///
    /// Logs a transition whenever the observed state differs from the
    /// previous poll. A query failure leaves the last state untouched; the
    /// caller decides whether to retry on the next tick.
    pub fn check(&mut self) -> Result<ProcessState> {
        let running = self.scanner.is_running(&self.target_name)?;
        let state = if running {
            ProcessState::Running
        } else {
            ProcessState::Stopped
        };

        self.stats.record_poll(Self::current_timestamp());

        match self.last_state {
            Some(prev) if prev == state => {
                debug!("Poll #{}: {} still {:?}", self.stats.total_polls, self.target_name, state);
            }
            Some(prev) => {
                self.stats.record_transition();
                info!(
                    "{}: {:?} -> {:?} (action now: {})",
                    self.target_name,
                    prev,
                    state,
                    state.action_label()
                );
            }
            None => {
                info!("{}: initial state {:?}", self.target_name, state);
            }
        }

        self.last_state = Some(state);
        Ok(state)
    }

    /// State observed by the most recent successful poll.
    pub fn state(&self) -> Option<ProcessState> {
        self.last_state
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn stats(&self) -> &WatchStats {
        &self.stats
    }

    /// Count an externally issued launch in the stats.
    pub fn record_start(&mut self) {
        self.stats.record_start();
    }

    /// Count an externally issued kill in the stats.
    pub fn record_kill(&mut self) {
        self.stats.record_kill();
    }
}
