//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one line per application event to
//! the logger (UART on the board, stderr on the host).

use log::{info, warn};

use crate::app::echo::SessionOutcome;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::error::SocketError;
use crate::mac;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                interface,
                mac: hw,
                dhcp,
            } => {
                info!(
                    "START | if={} | mac={} | addr={}",
                    interface,
                    mac::format_mac(hw),
                    if *dhcp { "dhcp" } else { "static" }
                );
            }
            AppEvent::AddressAcquired(ip) => {
                info!("ADDR | {}/{} gw {}", ip.address, ip.prefix_len, ip.gateway);
            }
            AppEvent::Session(r) => match r.outcome {
                SessionOutcome::Echoed => {
                    info!("SESSION | echoed {} bytes | polls={}", r.bytes_echoed, r.polls);
                }
                SessionOutcome::Failed(e) => {
                    warn!("SESSION | failed: {} | polls={}", e, r.polls);
                }
            },
            AppEvent::Summary(s) => {
                let ratio = s.success_ratio().map_or(0.0, |r| r * 100.0);
                info!(
                    "SUMMARY | sessions={} echoed={} ({:.0}%) bytes={} | \
                     connect_fail={} timeout={} eof={} rx_fail={} tx_fail={}",
                    s.sessions,
                    s.echoed,
                    ratio,
                    s.bytes_echoed,
                    s.failures_of(SocketError::OpenFailed) + s.failures_of(SocketError::ConnectFailed),
                    s.failures_of(SocketError::Timeout),
                    s.failures_of(SocketError::EndOfStream),
                    s.failures_of(SocketError::ReceiveFailed),
                    s.failures_of(SocketError::SendFailed),
                );
            }
        }
    }
}
