//! TCP echo client — the body of the user task.
//!
//! One *session* opens a socket, connects to the configured server, polls
//! for inbound bytes with a bounded budget, bounces the first chunk back
//! once, and closes the socket.  The user task repeats sessions forever
//! with a short pause in between.
//!
//! ```text
//!  connect ──▶ try_recv ──Pending──▶ delay(poll) ──┐
//!                 │  ▲                             │
//!                 │  └─────────── polls < max ─────┘
//!               Data(n)
//!                 │
//!                 ▼
//!            send_all(n) ──▶ close
//! ```

use core::net::SocketAddrV4;
use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::{ConfigError, MAX_RX_BUFFER_LEN, SystemConfig};
use crate::error::SocketError;

use super::ports::{Connector, EchoStream, Received};

// ───────────────────────────────────────────────────────────────
// Session report
// ───────────────────────────────────────────────────────────────

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// One chunk was received and written back.
    Echoed,
    /// The session stopped at the given socket error.
    Failed(SocketError),
}

/// Result of one session, posted to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    /// Bytes written back to the server (0 unless `Echoed`).
    pub bytes_echoed: usize,
    /// Receive attempts made while connected.
    pub polls: u32,
}

impl SessionReport {
    fn failed(error: SocketError, polls: u32) -> Self {
        Self {
            outcome: SessionOutcome::Failed(error),
            bytes_echoed: 0,
            polls,
        }
    }

    pub fn is_echoed(&self) -> bool {
        self.outcome == SessionOutcome::Echoed
    }
}

// ───────────────────────────────────────────────────────────────
// EchoClient
// ───────────────────────────────────────────────────────────────

pub struct EchoClient {
    server: SocketAddrV4,
    rx_buf: heapless::Vec<u8, MAX_RX_BUFFER_LEN>,
    poll_interval_ms: u32,
    max_polls: u32,
    connect_timeout: Duration,
    session_interval_ms: u32,
}

impl EchoClient {
    /// Build a client from a validated configuration.
    pub fn from_config(config: &SystemConfig) -> Result<Self, ConfigError> {
        let server = config.server_addr()?;
        let echo = &config.echo;
        let mut rx_buf = heapless::Vec::new();
        rx_buf
            .resize(echo.rx_buffer_len, 0)
            .map_err(|_| ConfigError::ValidationFailed("echo.rx_buffer_len out of range"))?;
        if echo.max_polls == 0 {
            return Err(ConfigError::ValidationFailed("echo.max_polls must be non-zero"));
        }
        Ok(Self {
            server,
            rx_buf,
            poll_interval_ms: echo.poll_interval_ms,
            max_polls: echo.max_polls,
            connect_timeout: Duration::from_millis(u64::from(echo.connect_timeout_ms)),
            session_interval_ms: echo.session_interval_ms,
        })
    }

    pub fn server(&self) -> SocketAddrV4 {
        self.server
    }

    /// Run one connect → wait → echo → close session.
    ///
    /// Never returns an error: failures are folded into the report so the
    /// user task can keep looping.
    pub fn run_session(
        &mut self,
        connector: &mut impl Connector,
        delay: &mut impl DelayNs,
    ) -> SessionReport {
        info!("Echo: connecting to {}", self.server);

        let mut stream = match connector.connect(self.server, self.connect_timeout) {
            Ok(s) => s,
            Err(e) => {
                warn!("Echo: {} ({})", e, self.server);
                return SessionReport::failed(e, 0);
            }
        };
        info!("Echo: successful connection");

        let report = self.exchange(&mut stream, delay);
        stream.close();
        info!("Echo: connection closed");

        if let SessionOutcome::Failed(e) = report.outcome {
            warn!("Echo: session ended: {} after {} polls", e, report.polls);
        }
        report
    }

    /// One full user-task iteration: session, publish, pause.
    pub fn step(
        &mut self,
        connector: &mut impl Connector,
        delay: &mut impl DelayNs,
        publish: impl FnOnce(SessionReport),
    ) {
        let report = self.run_session(connector, delay);
        publish(report);
        delay.delay_ms(self.session_interval_ms);
    }

    fn exchange(&mut self, stream: &mut impl EchoStream, delay: &mut impl DelayNs) -> SessionReport {
        let mut polls = 0;
        while polls < self.max_polls {
            polls += 1;
            match stream.try_recv(&mut self.rx_buf) {
                Ok(Received::Data(n)) => {
                    let n = n.min(self.rx_buf.len());
                    return match stream.send_all(&self.rx_buf[..n]) {
                        Ok(()) => {
                            info!("Echo: bounced {} bytes", n);
                            SessionReport {
                                outcome: SessionOutcome::Echoed,
                                bytes_echoed: n,
                                polls,
                            }
                        }
                        Err(e) => SessionReport::failed(e, polls),
                    };
                }
                Ok(Received::Pending) => {
                    if polls < self.max_polls {
                        delay.delay_ms(self.poll_interval_ms);
                    }
                }
                Err(e) => return SessionReport::failed(e, polls),
            }
        }
        SessionReport::failed(SocketError::Timeout, polls)
    }
}

/// User task body.  Never returns.
pub fn run_user_task<C: Connector, D: DelayNs>(
    mut client: EchoClient,
    mut connector: C,
    mut delay: D,
) -> ! {
    info!("User task: echo client targeting {}", client.server());
    loop {
        client.step(&mut connector, &mut delay, crate::channels::publish_report);
    }
}
