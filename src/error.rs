//! Unified error types for the tcpecho firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the startup
//! sequence and the tasks handle failures uniformly.  All variants are `Copy`
//! so session reports can carry them across the report channel without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Network stack or interface bring-up failed.
    Net(NetError),
    /// A TCP socket operation failed.
    Socket(SocketError),
    /// An RTOS task could not be created (out of resources).
    Task(&'static str),
    /// Writing the LED GPIO failed.
    Gpio,
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Net(e) => write!(f, "net: {e}"),
            Self::Socket(e) => write!(f, "socket: {e}"),
            Self::Task(name) => write!(f, "task '{name}': out of resources"),
            Self::Gpio => write!(f, "gpio: write failed"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Network bring-up errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    /// TCP/IP stack initialisation failed.
    StackInitFailed,
    /// MAC/PHY binding or interface configuration failed.
    InterfaceConfigFailed,
    /// DHCP client could not be initialised.
    DhcpInitFailed,
    /// DHCP client could not be started.
    DhcpStartFailed,
    /// Manual IPv4 configuration was rejected by the stack.
    StaticConfigFailed,
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackInitFailed => write!(f, "TCP/IP stack init failed"),
            Self::InterfaceConfigFailed => write!(f, "interface configuration failed"),
            Self::DhcpInitFailed => write!(f, "DHCP client init failed"),
            Self::DhcpStartFailed => write!(f, "DHCP client start failed"),
            Self::StaticConfigFailed => write!(f, "static IPv4 configuration failed"),
        }
    }
}

impl From<NetError> for Error {
    fn from(e: NetError) -> Self {
        Self::Net(e)
    }
}

// ---------------------------------------------------------------------------
// Socket errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketError {
    /// No socket could be allocated.
    OpenFailed,
    /// The remote host refused or did not answer in time.
    ConnectFailed,
    /// No data arrived within the poll budget.
    Timeout,
    /// The peer closed the connection.
    EndOfStream,
    /// Receive returned an error other than "would block".
    ReceiveFailed,
    /// The echo could not be written back.
    SendFailed,
}

impl SocketError {
    /// All variants, in counter order.  Used by the statistics table.
    pub const ALL: [SocketError; 6] = [
        Self::OpenFailed,
        Self::ConnectFailed,
        Self::Timeout,
        Self::EndOfStream,
        Self::ReceiveFailed,
        Self::SendFailed,
    ];

    /// Stable index into [`SocketError::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::OpenFailed => 0,
            Self::ConnectFailed => 1,
            Self::Timeout => 2,
            Self::EndOfStream => 3,
            Self::ReceiveFailed => 4,
            Self::SendFailed => 5,
        }
    }
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailed => write!(f, "failed to open socket"),
            Self::ConnectFailed => write!(f, "connect failed"),
            Self::Timeout => write!(f, "timed out waiting for data"),
            Self::EndOfStream => write!(f, "end of stream"),
            Self::ReceiveFailed => write!(f, "receive failed"),
            Self::SendFailed => write!(f, "send failed"),
        }
    }
}

impl From<SocketError> for Error {
    fn from(e: SocketError) -> Self {
        Self::Socket(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
