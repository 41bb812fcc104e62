//! Inter-task communication channels.
//!
//! Uses an `embassy-sync` bounded channel to carry session reports from the
//! user task to the supervisor loop on the main task.  The channel is a
//! static, so neither side needs a handle to the other.
//!
//! ```text
//! ┌──────────────┐  SessionReport  ┌──────────────┐
//! │  User Task   │───────────────▶│  Supervisor   │
//! └──────────────┘                 └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::echo::SessionReport;

/// Channel depth for session reports.
const REPORT_DEPTH: usize = 8;

/// Session reports: user task → supervisor.
pub static SESSION_REPORTS: Channel<CriticalSectionRawMutex, SessionReport, REPORT_DEPTH> =
    Channel::new();

/// Post a report without blocking.  A full channel drops the report.
pub fn publish_report(report: SessionReport) {
    if SESSION_REPORTS.try_send(report).is_err() {
        warn!("Reports: channel full, dropping session report");
    }
}

/// Drain all pending reports into a callback, in FIFO order.
pub fn drain_reports(mut handler: impl FnMut(SessionReport)) {
    while let Ok(report) = SESSION_REPORTS.try_receive() {
        handler(report);
    }
}
