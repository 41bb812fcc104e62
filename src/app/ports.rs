//! Port traits — the boundary between the application logic and the
//! network stack, sockets, and logging.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ startup / EchoClient (domain)
//! ```
//!
//! The ESP-IDF Ethernet driver, lwIP sockets, and the serial log implement
//! these traits in [`crate::adapters`].  Tests substitute recording mocks.
//! Timing goes through `embedded_hal::delay::DelayNs` and the LED through
//! `embedded_hal::digital::OutputPin`, so no extra ports are needed for them.

use core::net::{Ipv4Addr, SocketAddrV4};
use core::time::Duration;

use crate::config::StaticIpv4Settings;
use crate::error::{NetError, SocketError};
use crate::mac::MacAddress;

// ───────────────────────────────────────────────────────────────
// Network port (driven adapter: domain → TCP/IP stack)
// ───────────────────────────────────────────────────────────────

/// The MAC/PHY pair and identity bound to the logical interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceBinding {
    pub name: heapless::String<8>,
    pub mac: MacAddress,
    /// MAC (EMAC) driver identifier.
    pub mac_driver: &'static str,
    /// PHY driver identifier.
    pub phy_driver: &'static str,
}

/// DHCP client settings handed to the stack's DHCP client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DhcpSettings {
    /// Interface the lease applies to.
    pub interface: heapless::String<8>,
    /// Hostname option (12) sent in DISCOVER/REQUEST.
    pub hostname: heapless::String<32>,
    /// Rapid commit option (80).
    pub rapid_commit: bool,
}

/// Address information reported by the stack once the interface is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpInfo {
    pub address: Ipv4Addr,
    pub prefix_len: u8,
    pub gateway: Ipv4Addr,
}

/// Bring-up operations on the external TCP/IP stack.
///
/// Calls arrive in the order [`init_stack`](Self::init_stack) →
/// [`configure_interface`](Self::configure_interface) → either the DHCP pair
/// or [`configure_static`](Self::configure_static).
pub trait NetworkPort {
    /// Initialise the TCP/IP stack.
    fn init_stack(&mut self) -> Result<(), NetError>;

    /// Bind the MAC/PHY drivers, name, and MAC address, then configure the
    /// interface.
    fn configure_interface(&mut self, binding: &InterfaceBinding) -> Result<(), NetError>;

    /// Initialise the DHCP client.
    fn dhcp_init(&mut self, settings: &DhcpSettings) -> Result<(), NetError>;

    /// Start the DHCP client.  Returns once the client runs, not once a
    /// lease is held.
    fn dhcp_start(&mut self) -> Result<(), NetError>;

    /// Apply a manual IPv4 configuration.
    fn configure_static(&mut self, settings: &StaticIpv4Settings) -> Result<(), NetError>;

    /// Current address, `None` until one is assigned.
    fn ip_info(&self) -> Option<IpInfo>;
}

// ───────────────────────────────────────────────────────────────
// Socket ports (driven adapter: domain → TCP sockets)
// ───────────────────────────────────────────────────────────────

/// Outcome of a non-blocking receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    /// `n` bytes were copied into the buffer (`n > 0`).
    Data(usize),
    /// Nothing available yet.
    Pending,
}

/// A connected TCP stream.
pub trait EchoStream {
    /// Receive without blocking.  A peer close surfaces as
    /// [`SocketError::EndOfStream`].
    fn try_recv(&mut self, buf: &mut [u8]) -> Result<Received, SocketError>;

    /// Write all of `data`, blocking until the stack has accepted it.
    fn send_all(&mut self, data: &[u8]) -> Result<(), SocketError>;

    /// Shut the connection down and release the socket.
    fn close(&mut self);
}

/// Opens a socket and connects it to a remote endpoint.
pub trait Connector {
    type Stream: EchoStream;

    fn connect(
        &mut self,
        addr: SocketAddrV4,
        timeout: Duration,
    ) -> Result<Self::Stream, SocketError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The application emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
