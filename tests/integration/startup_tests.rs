//! Network bring-up through the simulated Ethernet adapter.

use std::net::Ipv4Addr;

use tcpecho::adapters::eth::{EthAdapter, EthState, SIM_LEASE};
use tcpecho::app::events::AppEvent;
use tcpecho::app::ports::NetworkPort;
use tcpecho::app::startup::{MAC_DRIVER, PHY_DRIVER, bring_up_network};
use tcpecho::app::supervisor::Supervisor;
use tcpecho::config::SystemConfig;
use tcpecho::error::{Error, NetError};

use super::mock_sink::RecordingSink;

#[test]
fn default_config_brings_interface_up_over_dhcp() {
    let mut eth = EthAdapter::new();
    bring_up_network(&mut eth, &SystemConfig::default()).unwrap();

    assert_eq!(eth.state(), EthState::Up);
    let binding = eth.binding().unwrap();
    assert_eq!(binding.name.as_str(), "eth0");
    assert_eq!(binding.mac, [0x00, 0xAB, 0xCD, 0xEF, 0x02, 0x07]);
    assert_eq!(binding.mac_driver, MAC_DRIVER);
    assert_eq!(binding.phy_driver, PHY_DRIVER);
    assert_eq!(eth.ip_info(), Some(SIM_LEASE));
}

#[test]
fn static_config_from_json_applies_address() {
    let cfg = SystemConfig::from_json(
        r#"{
            "net": {
                "use_dhcp": false,
                "static_ipv4": {
                    "address": "192.168.117.60",
                    "prefix_len": 24,
                    "gateway": "192.168.117.1"
                }
            }
        }"#,
    )
    .unwrap();

    let mut eth = EthAdapter::new();
    bring_up_network(&mut eth, &cfg).unwrap();

    let ip = eth.ip_info().unwrap();
    assert_eq!(ip.address, Ipv4Addr::new(192, 168, 117, 60));
    assert_eq!(ip.gateway, Ipv4Addr::new(192, 168, 117, 1));
}

#[test]
fn second_bring_up_is_rejected() {
    let mut eth = EthAdapter::new();
    let cfg = SystemConfig::default();
    bring_up_network(&mut eth, &cfg).unwrap();
    assert_eq!(
        bring_up_network(&mut eth, &cfg),
        Err(Error::Net(NetError::StackInitFailed))
    );
}

#[test]
fn supervisor_reports_address_once() {
    let mut eth = EthAdapter::new();
    let mut supervisor = Supervisor::default();
    let mut sink = RecordingSink::new();

    supervisor.poll_address(&eth, &mut sink);
    assert!(sink.events.is_empty());

    bring_up_network(&mut eth, &SystemConfig::default()).unwrap();
    supervisor.poll_address(&eth, &mut sink);
    supervisor.poll_address(&eth, &mut sink);

    assert_eq!(sink.events.len(), 1);
    assert!(matches!(sink.events[0], AppEvent::AddressAcquired(ip) if ip == SIM_LEASE));
}
