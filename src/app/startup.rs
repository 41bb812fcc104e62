//! One-time network bring-up.
//!
//! Sequences the stack calls the board needs before any task runs:
//!
//! 1. TCP/IP stack init
//! 2. interface binding (name, EMAC driver, DP83848 PHY, MAC address)
//! 3. DHCP client init + start, or manual IPv4
//!
//! The first failure aborts the sequence; nothing is retried here.

use log::{error, info};

use crate::config::SystemConfig;
use crate::error::{NetError, Result};
use crate::mac;

use super::ports::{DhcpSettings, InterfaceBinding, NetworkPort};

/// ESP32 internal Ethernet MAC.
pub const MAC_DRIVER: &str = "esp32-emac";
/// TI DP83848 RMII PHY.
pub const PHY_DRIVER: &str = "dp83848";

/// Build the interface binding from configuration.
pub fn interface_binding(config: &SystemConfig) -> Result<InterfaceBinding> {
    Ok(InterfaceBinding {
        name: config.net.interface_name.clone(),
        mac: config.mac()?,
        mac_driver: MAC_DRIVER,
        phy_driver: PHY_DRIVER,
    })
}

/// Build DHCP client settings: defaults, then interface, hostname, and
/// rapid-commit from configuration.
#[allow(clippy::field_reassign_with_default)]
pub fn dhcp_settings(config: &SystemConfig) -> Result<DhcpSettings> {
    let mut settings = DhcpSettings::default();
    settings.interface = config.net.interface_name.clone();
    settings.hostname = config.dhcp_hostname()?;
    settings.rapid_commit = config.net.dhcp_rapid_commit;
    Ok(settings)
}

/// Run the bring-up sequence against `net`.
pub fn bring_up_network(net: &mut impl NetworkPort, config: &SystemConfig) -> Result<()> {
    net.init_stack()?;
    info!("Net: TCP/IP stack initialised");

    let binding = interface_binding(config)?;
    net.configure_interface(&binding)?;
    info!(
        "Net: {} bound to {}/{} (MAC {})",
        binding.name,
        binding.mac_driver,
        binding.phy_driver,
        mac::format_mac(&binding.mac)
    );

    if config.net.use_dhcp {
        let settings = dhcp_settings(config)?;
        net.dhcp_init(&settings).map_err(|e| {
            error!("Failed to initialize DHCP client!");
            e
        })?;
        net.dhcp_start().map_err(|e| {
            error!("Failed to start DHCP client!");
            e
        })?;
        info!(
            "Net: DHCP client started (hostname '{}', rapid commit {})",
            settings.hostname,
            if settings.rapid_commit { "on" } else { "off" }
        );
    } else {
        let Some(settings) = config.static_ipv4()? else {
            return Err(NetError::StaticConfigFailed.into());
        };
        net.configure_static(&settings)?;
        info!(
            "Net: static {}/{} gw {}",
            settings.address, settings.prefix_len, settings.gateway
        );
    }
    Ok(())
}
