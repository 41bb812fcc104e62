//! TCP socket adapter.
//!
//! Implements [`Connector`] and [`EchoStream`] over `std::net`.  On ESP-IDF
//! the standard library maps these calls onto lwIP sockets, so one
//! implementation serves both the board and the host.
//!
//! Receives run with the socket in non-blocking mode.  Sends switch it back
//! to blocking so a write returns only once lwIP has taken every byte.

use core::net::SocketAddrV4;
use core::time::Duration;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

use log::{debug, warn};

use crate::app::ports::{Connector, EchoStream, Received};
use crate::error::SocketError;

/// Opens one TCP connection per session.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

impl TcpConnector {
    pub fn new() -> Self {
        Self
    }
}

/// EMFILE, ENFILE, ENOBUFS.  newlib (lwIP) and Linux number them alike.
const SOCKET_EXHAUSTED_ERRNOS: [i32; 3] = [24, 23, 105];

/// Failures to obtain a socket are `OpenFailed`; anything the peer or the
/// route causes is `ConnectFailed`.
pub fn classify_connect_error(e: &std::io::Error) -> SocketError {
    if e.kind() == ErrorKind::OutOfMemory {
        return SocketError::OpenFailed;
    }
    match e.raw_os_error() {
        Some(code) if SOCKET_EXHAUSTED_ERRNOS.contains(&code) => SocketError::OpenFailed,
        _ => SocketError::ConnectFailed,
    }
}

impl Connector for TcpConnector {
    type Stream = TcpSocket;

    fn connect(&mut self, addr: SocketAddrV4, timeout: Duration) -> Result<TcpSocket, SocketError> {
        let stream = TcpStream::connect_timeout(&SocketAddr::V4(addr), timeout).map_err(|e| {
            debug!("Tcp: connect {} -> {}", addr, e);
            classify_connect_error(&e)
        })?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Tcp: TCP_NODELAY not applied ({})", e);
        }
        stream
            .set_nonblocking(true)
            .map_err(|_| SocketError::OpenFailed)?;
        Ok(TcpSocket {
            stream: Some(stream),
        })
    }
}

/// A connected stream; dropped on [`close`](EchoStream::close).
#[derive(Debug)]
pub struct TcpSocket {
    stream: Option<TcpStream>,
}

impl TcpSocket {
    fn stream(&mut self) -> Result<&mut TcpStream, SocketError> {
        self.stream.as_mut().ok_or(SocketError::EndOfStream)
    }
}

impl EchoStream for TcpSocket {
    fn try_recv(&mut self, buf: &mut [u8]) -> Result<Received, SocketError> {
        let stream = self.stream()?;
        match stream.read(buf) {
            Ok(0) if !buf.is_empty() => Err(SocketError::EndOfStream),
            Ok(n) => Ok(Received::Data(n)),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(Received::Pending),
            Err(e) if e.kind() == ErrorKind::Interrupted => Ok(Received::Pending),
            Err(e) => {
                warn!("Tcp: receive failed ({})", e);
                Err(SocketError::ReceiveFailed)
            }
        }
    }

    fn send_all(&mut self, data: &[u8]) -> Result<(), SocketError> {
        let stream = self.stream()?;
        stream
            .set_nonblocking(false)
            .map_err(|_| SocketError::SendFailed)?;
        let sent = stream.write_all(data).and_then(|()| stream.flush());
        let restored = stream.set_nonblocking(true);
        sent.map_err(|e| {
            warn!("Tcp: send failed ({})", e);
            SocketError::SendFailed
        })?;
        restored.map_err(|_| SocketError::SendFailed)
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                debug!("Tcp: shutdown ({})", e);
            }
        }
    }
}

impl Drop for TcpSocket {
    fn drop(&mut self) {
        self.close();
    }
}
