//! Echo client against a loopback server, through the real `std::net`
//! adapter and the real task delay.

use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::thread;
use std::time::Duration;

use tcpecho::adapters::tcp::TcpConnector;
use tcpecho::adapters::time::TaskDelay;
use tcpecho::app::echo::{EchoClient, SessionOutcome};
use tcpecho::app::supervisor::Supervisor;
use tcpecho::config::SystemConfig;
use tcpecho::error::SocketError;

use super::mock_sink::RecordingSink;

fn local_server() -> (TcpListener, u16) {
    let l = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let SocketAddr::V4(addr) = l.local_addr().unwrap() else {
        unreachable!()
    };
    (l, addr.port())
}

fn client_for(port: u16, max_polls: u32) -> EchoClient {
    let mut cfg = SystemConfig::default();
    cfg.echo.server_host = "127.0.0.1".try_into().unwrap();
    cfg.echo.server_port = port;
    cfg.echo.poll_interval_ms = 10;
    cfg.echo.max_polls = max_polls;
    cfg.echo.connect_timeout_ms = 2000;
    cfg.echo.session_interval_ms = 10;
    cfg.validate().unwrap();
    EchoClient::from_config(&cfg).unwrap()
}

/// Accept one connection, send `greeting`, and return everything the
/// client writes before closing.
fn serve_once(listener: TcpListener, greeting: &'static [u8]) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        conn.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        if !greeting.is_empty() {
            conn.write_all(greeting).unwrap();
        }
        let mut back = Vec::new();
        let _ = conn.read_to_end(&mut back);
        back
    })
}

#[test]
fn server_greeting_is_echoed_back() {
    let (listener, port) = local_server();
    let server = serve_once(listener, b"hello from server");

    let mut client = client_for(port, 200);
    let report = client.run_session(&mut TcpConnector::new(), &mut TaskDelay::new());

    assert_eq!(report.outcome, SessionOutcome::Echoed);
    assert_eq!(report.bytes_echoed, 17);
    assert_eq!(server.join().unwrap(), b"hello from server");
}

#[test]
fn silent_server_times_out_and_connection_closes() {
    let (listener, port) = local_server();
    let server = serve_once(listener, b"");

    let mut client = client_for(port, 3);
    let report = client.run_session(&mut TcpConnector::new(), &mut TaskDelay::new());

    assert_eq!(report.outcome, SessionOutcome::Failed(SocketError::Timeout));
    assert_eq!(report.polls, 3);
    // read_to_end only returns once the client has shut the socket down.
    assert!(server.join().unwrap().is_empty());
}

#[test]
fn server_hangup_ends_session() {
    let (listener, port) = local_server();
    let server = thread::spawn(move || {
        let (conn, _) = listener.accept().unwrap();
        drop(conn);
    });

    let mut client = client_for(port, 200);
    let report = client.run_session(&mut TcpConnector::new(), &mut TaskDelay::new());
    server.join().unwrap();

    assert_eq!(
        report.outcome,
        SessionOutcome::Failed(SocketError::EndOfStream)
    );
}

#[test]
fn no_listener_is_connect_failure() {
    let (listener, port) = local_server();
    drop(listener);

    let mut client = client_for(port, 3);
    let report = client.run_session(&mut TcpConnector::new(), &mut TaskDelay::new());

    assert_eq!(
        report.outcome,
        SessionOutcome::Failed(SocketError::ConnectFailed)
    );
    assert_eq!(report.polls, 0);
}

#[test]
fn repeated_sessions_feed_supervisor() {
    let (listener, port) = local_server();
    let server = thread::spawn(move || {
        for _ in 0..3 {
            let (mut conn, _) = listener.accept().unwrap();
            conn.write_all(b"abc").unwrap();
            let mut back = Vec::new();
            let _ = conn.read_to_end(&mut back);
            assert_eq!(back, b"abc");
        }
    });

    let mut client = client_for(port, 200);
    let mut connector = TcpConnector::new();
    let mut delay = TaskDelay::new();
    let mut reports = Vec::new();
    for _ in 0..3 {
        client.step(&mut connector, &mut delay, |r| reports.push(r));
    }
    server.join().unwrap();

    let mut supervisor = Supervisor::new(3);
    let mut sink = RecordingSink::new();
    for r in reports {
        supervisor.on_report(r, &mut sink);
    }
    assert_eq!(sink.sessions(), 3);
    assert_eq!(sink.summaries(), 1);
    assert_eq!(supervisor.stats().echoed, 3);
    assert_eq!(supervisor.stats().bytes_echoed, 9);
}
