//! tcpecho firmware: main entry point.
//!
//! Ethernet TCP echo client with a heartbeat LED.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  EthAdapter        TcpConnector     TaskDelay    LogEventSink  │
//! │  (NetworkPort)     (Connector)      (DelayNs)    (EventSink)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  startup · EchoClient · Supervisor (pure logic)        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Tasks: "LED" (heartbeat) · "User Task" (echo) · main (sup.)   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use log::{error, info};

use tcpecho::adapters::eth::EthAdapter;
use tcpecho::adapters::log_sink::LogEventSink;
use tcpecho::adapters::tcp::TcpConnector;
use tcpecho::adapters::time::{TaskDelay, Uptime};
use tcpecho::app::echo::{EchoClient, run_user_task};
use tcpecho::app::events::AppEvent;
use tcpecho::app::ports::EventSink;
use tcpecho::app::startup::bring_up_network;
use tcpecho::app::supervisor::Supervisor;
use tcpecho::channels;
use tcpecho::config::{self, SystemConfig};
use tcpecho::drivers::status_led::HeartbeatLed;
use tcpecho::drivers::task_pin::{Core, spawn_task};
use tcpecho::error::Error;

/// Supervisor wake-up period.
const SUPERVISOR_PERIOD: Duration = Duration::from_millis(1000);

fn init_logging() -> Result<()> {
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    Ok(())
}

fn load_config() -> Result<SystemConfig> {
    let config = config::load();
    config.validate().map_err(Error::from)?;
    Ok(config)
}

// ── Board wiring ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn board() -> Result<(
    EthAdapter,
    esp_idf_hal::gpio::PinDriver<'static, esp_idf_hal::gpio::Gpio2, esp_idf_hal::gpio::Output>,
)> {
    use esp_idf_hal::gpio::PinDriver;
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use tcpecho::adapters::eth::RmiiParts;

    let p = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    // Status LED on the devkit's GPIO2.
    let led = PinDriver::output(p.pins.gpio2)?;

    let eth = EthAdapter::new(
        RmiiParts {
            mac: p.mac,
            rxd0: p.pins.gpio25,
            rxd1: p.pins.gpio26,
            crs_dv: p.pins.gpio27,
            mdc: p.pins.gpio23,
            txd1: p.pins.gpio22,
            tx_en: p.pins.gpio21,
            txd0: p.pins.gpio19,
            mdio: p.pins.gpio18,
            ref_clk: p.pins.gpio0,
        },
        sysloop,
    );
    Ok((eth, led))
}

#[cfg(not(target_os = "espidf"))]
fn board() -> Result<(EthAdapter, tcpecho::drivers::status_led::SimLedPin)> {
    Ok((EthAdapter::new(), tcpecho::drivers::status_led::SimLedPin::new()))
}

// ── Main ──────────────────────────────────────────────────────

/// Inner width of the startup banner box.
const BANNER_WIDTH: usize = 38;

fn banner(version: &str) -> [String; 3] {
    let title = format!("  tcpecho v{version}");
    [
        format!("╔{}╗", "═".repeat(BANNER_WIDTH)),
        format!("║{title:<width$}║", width = BANNER_WIDTH),
        format!("╚{}╝", "═".repeat(BANNER_WIDTH)),
    ]
}

fn main() -> Result<()> {
    let uptime = Uptime::new();
    init_logging()?;

    for line in banner(env!("CARGO_PKG_VERSION")) {
        info!("{}", line);
    }

    let (config, net) = match start() {
        Ok(up) => up,
        Err(e) => {
            error!("Startup failed: {:#}", e);
            return Err(e);
        }
    };

    let mut sink = LogEventSink::new();
    sink.emit(&AppEvent::Started {
        interface: config.net.interface_name.clone(),
        mac: config.mac().map_err(Error::from)?,
        dhcp: config.net.use_dhcp,
    });

    info!("System ready after {} ms. Entering supervisor loop.", uptime.millis());
    let mut supervisor = Supervisor::default();
    loop {
        channels::drain_reports(|report| supervisor.on_report(report, &mut sink));
        supervisor.poll_address(&net, &mut sink);
        std::thread::sleep(SUPERVISOR_PERIOD);
    }
}

/// Config → LED → network → tasks.  Any failure aborts startup.
fn start() -> Result<(SystemConfig, EthAdapter)> {
    let config = load_config()?;

    let (mut net, led_pin) = board()?;
    let led = HeartbeatLed::new(led_pin, config.heartbeat.half_period_ms);

    bring_up_network(&mut net, &config)?;

    let client = EchoClient::from_config(&config).map_err(Error::from)?;

    spawn_task(Core::App, config.tasks.led, "LED\0", move || {
        led.run(TaskDelay::new())
    })?;
    spawn_task(Core::App, config.tasks.user, "User Task\0", move || {
        run_user_task(client, TcpConnector::new(), TaskDelay::new())
    })?;

    Ok((config, net))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_rows_line_up() {
        for version in ["0.1.0", env!("CARGO_PKG_VERSION"), "10.20.30-rc.1"] {
            let rows = banner(version);
            let widths: Vec<usize> = rows.iter().map(|r| r.chars().count()).collect();
            assert_eq!(widths, vec![BANNER_WIDTH + 2; 3], "{version}");
            assert!(rows[1].contains(version));
        }
    }
}
