use tracing::{debug, trace};

/// Elapsed-seconds counter. Starting while running and stopping while
/// stopped are no-ops; stopping keeps the elapsed time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timer {
    running: bool,
    elapsed: u64,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the timer was stopped before.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        debug!(elapsed = self.elapsed, "Timer started");
        self.running = true;
        true
    }

    /// Returns `true` if the timer was running before.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        debug!(elapsed = self.elapsed, "Timer stopped");
        self.running = false;
        true
    }

    /// Count one second. Returns the new elapsed time, or `None` when
    /// stopped.
    pub fn tick(&mut self) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.elapsed += 1;
        trace!(elapsed = self.elapsed, "Timer tick");
        Some(self.elapsed)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

/// `mm:ss`, or `hh:mm:ss` from one hour on.
pub fn format_elapsed(seconds: u64) -> String {
    let (hours, minutes, secs) = (seconds / 3600, seconds / 60 % 60, seconds % 60);
    if seconds >= 3600 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}
