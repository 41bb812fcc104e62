//! Outbound application events.
//!
//! The supervisor loop emits these through the
//! [`EventSink`](super::ports::EventSink) port.

use crate::mac::MacAddress;

use super::echo::SessionReport;
use super::ports::IpInfo;
use super::stats::EchoStats;

/// Structured events emitted by the application.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Startup finished and both tasks are running.
    Started {
        interface: heapless::String<8>,
        mac: MacAddress,
        dhcp: bool,
    },

    /// The interface reported an address for the first time (or a new one).
    AddressAcquired(IpInfo),

    /// The user task finished one echo session.
    Session(SessionReport),

    /// Periodic roll-up of session statistics.
    Summary(EchoStats),
}
