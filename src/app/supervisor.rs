//! Supervisor: the main task's view of the running system.
//!
//! Owns the session statistics and decides which events reach the
//! [`EventSink`]: every session report, a summary every
//! [`SUMMARY_EVERY`] sessions, and the interface address whenever it
//! changes.  Holds no hardware; `main` feeds it from the report channel and
//! the network adapter.

use super::echo::SessionReport;
use super::events::AppEvent;
use super::ports::{EventSink, IpInfo, NetworkPort};
use super::stats::EchoStats;

/// Sessions between two `Summary` events.
pub const SUMMARY_EVERY: u64 = 50;

pub struct Supervisor {
    stats: EchoStats,
    summary_every: u64,
    address: Option<IpInfo>,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new(SUMMARY_EVERY)
    }
}

impl Supervisor {
    /// `summary_every` of 0 is taken as 1: a summary after every session.
    pub fn new(summary_every: u64) -> Self {
        Self {
            stats: EchoStats::new(),
            summary_every: summary_every.max(1),
            address: None,
        }
    }

    pub fn stats(&self) -> &EchoStats {
        &self.stats
    }

    pub fn address(&self) -> Option<IpInfo> {
        self.address
    }

    /// Fold one report into the totals and emit it.
    pub fn on_report(&mut self, report: SessionReport, sink: &mut impl EventSink) {
        self.stats.record(&report);
        sink.emit(&AppEvent::Session(report));
        if self.stats.sessions % self.summary_every == 0 {
            sink.emit(&AppEvent::Summary(self.stats.clone()));
        }
    }

    /// Emit `AddressAcquired` when the interface reports a new address.
    pub fn poll_address(&mut self, net: &impl NetworkPort, sink: &mut impl EventSink) {
        let current = net.ip_info();
        if current == self.address {
            return;
        }
        self.address = current;
        if let Some(ip) = current {
            sink.emit(&AppEvent::AddressAcquired(ip));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::echo::SessionOutcome;
    use crate::app::ports::DhcpSettings;
    use crate::app::ports::InterfaceBinding;
    use crate::config::StaticIpv4Settings;
    use crate::error::{NetError, SocketError};
    use core::net::Ipv4Addr;

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<AppEvent>,
    }

    impl EventSink for RecordingSink {
        fn emit(&mut self, event: &AppEvent) {
            self.events.push(event.clone());
        }
    }

    struct FixedNet(Option<IpInfo>);

    impl NetworkPort for FixedNet {
        fn init_stack(&mut self) -> Result<(), NetError> {
            Ok(())
        }
        fn configure_interface(&mut self, _: &InterfaceBinding) -> Result<(), NetError> {
            Ok(())
        }
        fn dhcp_init(&mut self, _: &DhcpSettings) -> Result<(), NetError> {
            Ok(())
        }
        fn dhcp_start(&mut self) -> Result<(), NetError> {
            Ok(())
        }
        fn configure_static(&mut self, _: &StaticIpv4Settings) -> Result<(), NetError> {
            Ok(())
        }
        fn ip_info(&self) -> Option<IpInfo> {
            self.0
        }
    }

    fn echoed(bytes: usize) -> SessionReport {
        SessionReport {
            outcome: SessionOutcome::Echoed,
            bytes_echoed: bytes,
            polls: 1,
        }
    }

    fn lease(last: u8) -> IpInfo {
        IpInfo {
            address: Ipv4Addr::new(192, 168, 117, last),
            prefix_len: 24,
            gateway: Ipv4Addr::new(192, 168, 117, 1),
        }
    }

    #[test]
    fn summary_every_n_sessions() {
        let mut sup = Supervisor::new(3);
        let mut sink = RecordingSink::default();

        for _ in 0..6 {
            sup.on_report(echoed(4), &mut sink);
        }
        sup.on_report(
            SessionReport {
                outcome: SessionOutcome::Failed(SocketError::Timeout),
                bytes_echoed: 0,
                polls: 600,
            },
            &mut sink,
        );

        let summaries: Vec<_> = sink
            .events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Summary(s) => Some(s.sessions),
                _ => None,
            })
            .collect();
        assert_eq!(summaries, vec![3, 6]);
        assert_eq!(sink.events.len(), 7 + 2);
        assert_eq!(sup.stats().bytes_echoed, 24);
        assert_eq!(sup.stats().failures_of(SocketError::Timeout), 1);
    }

    #[test]
    fn zero_summary_period_summarises_every_session() {
        let mut sup = Supervisor::new(0);
        let mut sink = RecordingSink::default();
        sup.on_report(echoed(1), &mut sink);
        sup.on_report(echoed(1), &mut sink);

        let summaries = sink
            .events
            .iter()
            .filter(|e| matches!(e, AppEvent::Summary(_)))
            .count();
        assert_eq!(summaries, 2);
    }

    #[test]
    fn address_reported_once_until_it_changes() {
        let mut sup = Supervisor::default();
        let mut sink = RecordingSink::default();

        sup.poll_address(&FixedNet(None), &mut sink);
        assert!(sink.events.is_empty());

        sup.poll_address(&FixedNet(Some(lease(50))), &mut sink);
        sup.poll_address(&FixedNet(Some(lease(50))), &mut sink);
        assert_eq!(sink.events.len(), 1);

        // Lease lost, then renewed with another address.
        sup.poll_address(&FixedNet(None), &mut sink);
        sup.poll_address(&FixedNet(Some(lease(51))), &mut sink);
        assert_eq!(sink.events.len(), 2);
        assert!(matches!(
            sink.events[1],
            AppEvent::AddressAcquired(ip) if ip == lease(51)
        ));
        assert_eq!(sup.address(), Some(lease(51)));
    }
}
