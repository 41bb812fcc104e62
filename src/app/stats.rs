//! Running totals over echo sessions, kept by the supervisor.

use crate::error::SocketError;

use super::echo::{SessionOutcome, SessionReport};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EchoStats {
    pub sessions: u64,
    pub echoed: u64,
    pub bytes_echoed: u64,
    /// Failure counters indexed by [`SocketError::index`].
    pub failures: [u64; SocketError::ALL.len()],
}

impl EchoStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: &SessionReport) {
        self.sessions += 1;
        match report.outcome {
            SessionOutcome::Echoed => {
                self.echoed += 1;
                self.bytes_echoed += report.bytes_echoed as u64;
            }
            SessionOutcome::Failed(e) => self.failures[e.index()] += 1,
        }
    }

    pub fn failures_of(&self, error: SocketError) -> u64 {
        self.failures[error.index()]
    }

    /// Fraction of sessions that echoed, `None` before the first session.
    pub fn success_ratio(&self) -> Option<f32> {
        if self.sessions == 0 {
            return None;
        }
        Some(self.echoed as f32 / self.sessions as f32)
    }
}
