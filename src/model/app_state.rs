use super::ping_result::PingResult;
use chrono::{DateTime, Local};

/// Everything the dashboard shows, shared between the poller and the UI.
#[derive(Debug, Default)]
pub struct AppState {
    /// Latest applied fetch result, in the order the backend returned it.
    pub snapshot: Vec<PingResult>,
    /// Number of fetches currently outstanding.
    pub in_flight: usize,
    /// Sequence number of the fetch the snapshot came from (0 = none yet).
    pub applied_seq: u64,
    /// When the snapshot was last replaced.
    pub last_updated: Option<DateTime<Local>>,
    /// Set on teardown; late results are dropped once this is true.
    pub stopped: bool,
    /// True until the first fetch finishes, so startup shows the spinner, not an empty table.
    pub awaiting_first_fetch: bool,
}

impl AppState {
    /// State for a dashboard whose poller is about to start.
    pub fn starting() -> Self {
        Self {
            awaiting_first_fetch: true,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0 || self.awaiting_first_fetch
    }

    /// Marks a fetch as started. Returns `false` if the dashboard is already torn down.
    pub fn begin_fetch(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        self.in_flight += 1;
        true
    }

    /// Finishes fetch `seq`. A successful result replaces the snapshot only when it is
    /// newer than the one already shown; failures leave it untouched.
    ///
    /// Returns `true` if the snapshot was replaced.
    pub fn apply_fetch<E>(&mut self, seq: u64, result: Result<Vec<PingResult>, E>) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.awaiting_first_fetch = false;

        if self.stopped {
            return false;
        }

        match result {
            Ok(rows) if seq > self.applied_seq => {
                self.snapshot = rows;
                self.applied_seq = seq;
                self.last_updated = Some(Local::now());
                true
            }
            _ => false,
        }
    }

    pub fn stop(&mut self) {
        self.stopped = true;
        self.in_flight = 0;
        self.awaiting_first_fetch = false;
    }
}
