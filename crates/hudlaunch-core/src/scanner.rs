use crate::{types::ProcessInfo, Result};
use sysinfo::System;

/// Process-table queries
///
/// Stateless between calls: every query refreshes a fresh view of the OS
/// process table, so the answer is never a cached one.
pub struct ProcessScanner;

impl ProcessScanner {
    pub fn new() -> Self {
        Self
    }

    /// True iff at least one process whose name matches `name` exactly exists.
    pub fn is_running(&self, name: &str) -> Result<bool> {
        Ok(self.find(name)?.is_some())
    }

    /// First process matching `name` exactly.
    ///
    /// When several processes share the name, the first one returned by the
    /// OS is treated as "the" process.
    pub fn find(&self, name: &str) -> Result<Option<ProcessInfo>> {
        Ok(self.find_all(name)?.into_iter().next())
    }

    /// All processes matching `name` exactly.
    pub fn find_all(&self, name: &str) -> Result<Vec<ProcessInfo>> {
        let mut sys = System::new();
        sys.refresh_processes();

        let mut processes = Vec::new();
        for proc_ in sys.processes_by_exact_name(name) {
            let command = if proc_.cmd().is_empty() {
                proc_.name().to_string()
            } else {
                proc_.cmd().join(" ")
            };
            processes.push(ProcessInfo::new(
                proc_.pid().as_u32(),
                proc_.name().to_string(),
                command,
                proc_.memory() / 1024,
            ));
        }

        Ok(processes)
    }
}

impl Default for ProcessScanner {
    fn default() -> Self {
        Self::new()
    }
}
