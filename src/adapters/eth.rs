//! Wired Ethernet adapter.
//!
//! Implements [`NetworkPort`] for the ESP32 internal EMAC driving a TI
//! DP83848 PHY over RMII.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::eth` driver wrapped by an
//!   `esp-netif` instance, lwIP underneath.
//! - **all other targets**: a simulation that walks the same state machine
//!   and reports addresses without touching hardware.
//!
//! ## RMII pin map (fixed by the ESP32 EMAC)
//!
//! | Signal  | GPIO |
//! |---------|------|
//! | RXD0    | 25   |
//! | RXD1    | 26   |
//! | CRS_DV  | 27   |
//! | MDC     | 23   |
//! | TXD1    | 22   |
//! | TX_EN   | 21   |
//! | TXD0    | 19   |
//! | MDIO    | 18   |
//! | REF_CLK | 0 (50 MHz from the PHY board) |
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialised ─init_stack─▶ StackReady ─configure_interface─▶ InterfaceBound
//!       InterfaceBound ─dhcp_init─▶ Configured ─dhcp_start─▶ Up
//!       InterfaceBound ─configure_static──────────────────▶ Up
//! ```
//!
//! Calls out of order fail with the error of the step being attempted.

use log::{info, warn};

use crate::app::ports::{DhcpSettings, InterfaceBinding, IpInfo, NetworkPort};
use crate::config::StaticIpv4Settings;
use crate::error::NetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthState {
    Uninitialised,
    StackReady,
    InterfaceBound,
    /// DHCP client configured, not yet running.
    Configured,
    Up,
}

/// Default PHY address strapped on DP83848 breakout boards.
pub const DP83848_PHY_ADDR: u32 = 1;

/// DHCP may only run on the interface `configure_interface` bound.
pub fn check_dhcp_interface(
    bound: Option<&heapless::String<8>>,
    requested: &heapless::String<8>,
) -> Result<(), NetError> {
    if bound == Some(requested) {
        return Ok(());
    }
    warn!("Eth: DHCP settings name an unknown interface '{}'", requested);
    Err(NetError::DhcpInitFailed)
}

/// esp-netif key for an interface name. Names are at most 8 bytes, so they
/// always fit.
pub fn netif_key(name: &heapless::String<8>) -> heapless::String<32> {
    let mut key = heapless::String::new();
    let _ = key.push_str(name);
    key
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF implementation
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod platform {
    use esp_idf_hal::gpio;
    use esp_idf_hal::mac::MAC;
    use esp_idf_svc::eth::{EspEth, EthDriver, RmiiClockConfig, RmiiEth, RmiiEthChipset};
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::ipv4;
    use esp_idf_svc::netif::{EspNetif, NetifConfiguration};
    use esp_idf_svc::sys::{EspError, esp};

    use super::*;

    /// Peripherals consumed by the RMII driver.
    pub struct RmiiParts {
        pub mac: MAC,
        pub rxd0: gpio::Gpio25,
        pub rxd1: gpio::Gpio26,
        pub crs_dv: gpio::Gpio27,
        pub mdc: gpio::Gpio23,
        pub txd1: gpio::Gpio22,
        pub tx_en: gpio::Gpio21,
        pub txd0: gpio::Gpio19,
        pub mdio: gpio::Gpio18,
        pub ref_clk: gpio::Gpio0,
    }

    pub struct EthAdapter {
        state: EthState,
        parts: Option<RmiiParts>,
        sysloop: EspSystemEventLoop,
        driver: Option<EthDriver<'static, RmiiEth>>,
        name: Option<heapless::String<8>>,
        netif_conf: Option<NetifConfiguration>,
        eth: Option<EspEth<'static, RmiiEth>>,
    }

    fn log_err(step: &str, e: EspError) {
        warn!("Eth: {} failed ({})", step, e);
    }

    impl EthAdapter {
        pub fn new(parts: RmiiParts, sysloop: EspSystemEventLoop) -> Self {
            Self {
                state: EthState::Uninitialised,
                parts: Some(parts),
                sysloop,
                driver: None,
                name: None,
                netif_conf: None,
                eth: None,
            }
        }

        pub fn state(&self) -> EthState {
            self.state
        }

        /// Default Ethernet netif carrying the bound interface name.
        fn netif_configuration(&self, ip: ipv4::ClientConfiguration) -> NetifConfiguration {
            let defaults = NetifConfiguration::eth_default_client();
            let (key, description) = match &self.name {
                Some(name) => (netif_key(name), name.clone()),
                None => (defaults.key.clone(), defaults.description.clone()),
            };
            NetifConfiguration {
                key,
                description,
                ip_configuration: Some(ipv4::Configuration::Client(ip)),
                ..defaults
            }
        }

        fn bring_up(
            &mut self,
            driver: EthDriver<'static, RmiiEth>,
            conf: NetifConfiguration,
        ) -> Result<(), EspError> {
            let netif = EspNetif::new_with_conf(&conf)?;
            let mut eth = EspEth::wrap_all(driver, netif)?;
            eth.start()?;
            self.eth = Some(eth);
            Ok(())
        }
    }

    impl NetworkPort for EthAdapter {
        fn init_stack(&mut self) -> Result<(), NetError> {
            if self.state != EthState::Uninitialised {
                return Err(NetError::StackInitFailed);
            }
            // SAFETY: plain IDF call, idempotent.
            esp!(unsafe { esp_idf_svc::sys::esp_netif_init() }).map_err(|e| {
                log_err("esp_netif_init", e);
                NetError::StackInitFailed
            })?;
            self.state = EthState::StackReady;
            Ok(())
        }

        fn configure_interface(&mut self, binding: &InterfaceBinding) -> Result<(), NetError> {
            if self.state != EthState::StackReady {
                return Err(NetError::InterfaceConfigFailed);
            }
            let p = self.parts.take().ok_or(NetError::InterfaceConfigFailed)?;

            let driver = EthDriver::new_rmii(
                p.mac,
                p.rxd0,
                p.rxd1,
                p.crs_dv,
                p.mdc,
                p.txd1,
                p.tx_en,
                p.txd0,
                p.mdio,
                RmiiClockConfig::<gpio::Gpio0, gpio::Gpio16, gpio::Gpio17>::Input(p.ref_clk),
                None::<gpio::AnyOutputPin>,
                RmiiEthChipset::DP83848,
                Some(DP83848_PHY_ADDR),
                self.sysloop.clone(),
            )
            .map_err(|e| {
                log_err("EMAC/PHY install", e);
                NetError::InterfaceConfigFailed
            })?;

            let mut mac = binding.mac;
            // SAFETY: the handle belongs to the live driver and `mac` is six
            // bytes, as ETH_CMD_S_MAC_ADDR expects.
            esp!(unsafe {
                esp_idf_svc::sys::esp_eth_ioctl(
                    driver.handle(),
                    esp_idf_svc::sys::esp_eth_io_cmd_t_ETH_CMD_S_MAC_ADDR,
                    mac.as_mut_ptr().cast(),
                )
            })
            .map_err(|e| {
                log_err("set MAC", e);
                NetError::InterfaceConfigFailed
            })?;

            info!("Eth: {} bound to {}/{}", binding.name, binding.mac_driver, binding.phy_driver);
            self.driver = Some(driver);
            self.name = Some(binding.name.clone());
            self.state = EthState::InterfaceBound;
            Ok(())
        }

        fn dhcp_init(&mut self, settings: &DhcpSettings) -> Result<(), NetError> {
            if self.state != EthState::InterfaceBound {
                return Err(NetError::DhcpInitFailed);
            }
            check_dhcp_interface(self.name.as_ref(), &settings.interface)?;
            let hostname: Option<heapless::String<30>> = settings.hostname.as_str().try_into().ok();
            if hostname.is_none() {
                warn!("Eth: hostname '{}' too long for DHCP option, omitted", settings.hostname);
            }
            if settings.rapid_commit {
                // lwIP negotiates without option 80.
                info!("Eth: rapid commit requested, not supported by lwIP DHCP");
            }
            self.netif_conf = Some(self.netif_configuration(ipv4::ClientConfiguration::DHCP(
                ipv4::DHCPClientSettings { hostname },
            )));
            self.state = EthState::Configured;
            Ok(())
        }

        fn dhcp_start(&mut self) -> Result<(), NetError> {
            if self.state != EthState::Configured {
                return Err(NetError::DhcpStartFailed);
            }
            let conf = self.netif_conf.take().ok_or(NetError::DhcpStartFailed)?;
            let driver = self.driver.take().ok_or(NetError::DhcpStartFailed)?;
            self.bring_up(driver, conf).map_err(|e| {
                log_err("DHCP start", e);
                NetError::DhcpStartFailed
            })?;
            self.state = EthState::Up;
            Ok(())
        }

        fn configure_static(&mut self, settings: &StaticIpv4Settings) -> Result<(), NetError> {
            if self.state != EthState::InterfaceBound {
                return Err(NetError::StaticConfigFailed);
            }
            let fixed = ipv4::ClientSettings {
                ip: settings.address,
                subnet: ipv4::Subnet {
                    gateway: settings.gateway,
                    mask: ipv4::Mask(settings.prefix_len),
                },
                dns: settings.dns,
                secondary_dns: None,
            };
            let conf = self.netif_configuration(ipv4::ClientConfiguration::Fixed(fixed));
            let driver = self.driver.take().ok_or(NetError::StaticConfigFailed)?;
            self.bring_up(driver, conf).map_err(|e| {
                log_err("static IPv4", e);
                NetError::StaticConfigFailed
            })?;
            self.state = EthState::Up;
            Ok(())
        }

        fn ip_info(&self) -> Option<IpInfo> {
            let info = self.eth.as_ref()?.netif().get_ip_info().ok()?;
            if info.ip.is_unspecified() {
                return None;
            }
            Some(IpInfo {
                address: info.ip,
                prefix_len: info.subnet.mask.0,
                gateway: info.subnet.gateway,
            })
        }
    }
}

#[cfg(target_os = "espidf")]
pub use platform::{EthAdapter, RmiiParts};

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod platform {
    use core::net::Ipv4Addr;

    use super::*;

    /// Lease handed out by the simulated DHCP server.
    pub const SIM_LEASE: IpInfo = IpInfo {
        address: Ipv4Addr::new(192, 168, 117, 200),
        prefix_len: 24,
        gateway: Ipv4Addr::new(192, 168, 117, 1),
    };

    pub struct EthAdapter {
        state: EthState,
        binding: Option<InterfaceBinding>,
        dhcp: Option<DhcpSettings>,
        address: Option<IpInfo>,
    }

    impl Default for EthAdapter {
        fn default() -> Self {
            Self::new()
        }
    }

    impl EthAdapter {
        pub fn new() -> Self {
            Self {
                state: EthState::Uninitialised,
                binding: None,
                dhcp: None,
                address: None,
            }
        }

        pub fn state(&self) -> EthState {
            self.state
        }

        pub fn binding(&self) -> Option<&InterfaceBinding> {
            self.binding.as_ref()
        }
    }

    impl NetworkPort for EthAdapter {
        fn init_stack(&mut self) -> Result<(), NetError> {
            if self.state != EthState::Uninitialised {
                return Err(NetError::StackInitFailed);
            }
            info!("Eth(sim): stack ready");
            self.state = EthState::StackReady;
            Ok(())
        }

        fn configure_interface(&mut self, binding: &InterfaceBinding) -> Result<(), NetError> {
            if self.state != EthState::StackReady {
                return Err(NetError::InterfaceConfigFailed);
            }
            info!("Eth(sim): {} link up", binding.name);
            self.binding = Some(binding.clone());
            self.state = EthState::InterfaceBound;
            Ok(())
        }

        fn dhcp_init(&mut self, settings: &DhcpSettings) -> Result<(), NetError> {
            if self.state != EthState::InterfaceBound {
                return Err(NetError::DhcpInitFailed);
            }
            check_dhcp_interface(self.binding.as_ref().map(|b| &b.name), &settings.interface)?;
            self.dhcp = Some(settings.clone());
            self.state = EthState::Configured;
            Ok(())
        }

        fn dhcp_start(&mut self) -> Result<(), NetError> {
            if self.state != EthState::Configured {
                return Err(NetError::DhcpStartFailed);
            }
            self.address = Some(SIM_LEASE);
            self.state = EthState::Up;
            Ok(())
        }

        fn configure_static(&mut self, settings: &StaticIpv4Settings) -> Result<(), NetError> {
            if self.state != EthState::InterfaceBound {
                return Err(NetError::StaticConfigFailed);
            }
            self.address = Some(IpInfo {
                address: settings.address,
                prefix_len: settings.prefix_len,
                gateway: settings.gateway,
            });
            self.state = EthState::Up;
            Ok(())
        }

        fn ip_info(&self) -> Option<IpInfo> {
            self.address
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub use platform::{EthAdapter, SIM_LEASE};

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use core::net::Ipv4Addr;

    fn binding() -> InterfaceBinding {
        InterfaceBinding {
            name: "eth0".try_into().unwrap(),
            mac: [0x00, 0xAB, 0xCD, 0xEF, 0x02, 0x07],
            mac_driver: "esp32-emac",
            phy_driver: "dp83848",
        }
    }

    fn dhcp() -> DhcpSettings {
        DhcpSettings {
            interface: "eth0".try_into().unwrap(),
            hostname: "tcpecho-ef0207".try_into().unwrap(),
            rapid_commit: false,
        }
    }

    #[test]
    fn dhcp_walks_to_up_and_reports_lease() {
        let mut eth = EthAdapter::new();
        eth.init_stack().unwrap();
        eth.configure_interface(&binding()).unwrap();
        eth.dhcp_init(&dhcp()).unwrap();
        assert_eq!(eth.state(), EthState::Configured);
        assert_eq!(eth.ip_info(), None);

        eth.dhcp_start().unwrap();
        assert_eq!(eth.state(), EthState::Up);
        assert_eq!(eth.ip_info(), Some(SIM_LEASE));
    }

    #[test]
    fn static_address_is_reported() {
        let mut eth = EthAdapter::new();
        eth.init_stack().unwrap();
        eth.configure_interface(&binding()).unwrap();
        eth.configure_static(&StaticIpv4Settings {
            address: Ipv4Addr::new(10, 0, 0, 7),
            prefix_len: 8,
            gateway: Ipv4Addr::new(10, 0, 0, 1),
            dns: None,
        })
        .unwrap();

        let ip = eth.ip_info().unwrap();
        assert_eq!(ip.address, Ipv4Addr::new(10, 0, 0, 7));
        assert_eq!(ip.prefix_len, 8);
    }

    #[test]
    fn out_of_order_calls_fail() {
        let mut eth = EthAdapter::new();
        assert_eq!(eth.configure_interface(&binding()), Err(NetError::InterfaceConfigFailed));
        assert_eq!(eth.dhcp_start(), Err(NetError::DhcpStartFailed));

        eth.init_stack().unwrap();
        assert_eq!(eth.init_stack(), Err(NetError::StackInitFailed));
        assert_eq!(eth.dhcp_init(&dhcp()), Err(NetError::DhcpInitFailed));
    }

    #[test]
    fn dhcp_on_unknown_interface_rejected() {
        let mut eth = EthAdapter::new();
        eth.init_stack().unwrap();
        eth.configure_interface(&binding()).unwrap();
        let mut settings = dhcp();
        settings.interface = "eth1".try_into().unwrap();
        assert_eq!(eth.dhcp_init(&settings), Err(NetError::DhcpInitFailed));
        assert_eq!(eth.state(), EthState::InterfaceBound);
    }

    #[test]
    fn dhcp_interface_must_match_binding() {
        let eth0: heapless::String<8> = "eth0".try_into().unwrap();
        let eth1: heapless::String<8> = "eth1".try_into().unwrap();
        assert_eq!(check_dhcp_interface(Some(&eth0), &eth0), Ok(()));
        assert_eq!(check_dhcp_interface(Some(&eth0), &eth1), Err(NetError::DhcpInitFailed));
        assert_eq!(check_dhcp_interface(None, &eth0), Err(NetError::DhcpInitFailed));
    }

    #[test]
    fn netif_key_carries_full_interface_name() {
        let name: heapless::String<8> = "ethernet".try_into().unwrap();
        assert_eq!(netif_key(&name).as_str(), "ethernet");
        assert_eq!(netif_key(&"eth0".try_into().unwrap()).as_str(), "eth0");
    }
}
