//! System configuration parameters
//!
//! All tunable parameters for the tcpecho firmware.  Defaults reproduce the
//! board's fixed setup; a JSON document (embedded at build time through
//! `TCPECHO_CONFIG_JSON`, or on host builds a file named by `TCPECHO_CONFIG`)
//! can override any subset of fields.

use core::net::{Ipv4Addr, SocketAddrV4};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::mac::{self, MacAddress};

/// Errors from loading or validating a configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for [`SystemConfig`].
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed config document"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Malformed => Self::Config("malformed config document"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

fn hstr<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    let _ = out.push_str(s);
    out
}

/// Core system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub net: NetConfig,
    pub echo: EchoConfig,
    pub heartbeat: HeartbeatConfig,
    pub tasks: TaskConfig,
}

/// Network interface setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Logical interface name
    pub interface_name: heapless::String<8>,
    /// Host MAC address, `-` or `:` separated
    pub mac_address: heapless::String<17>,
    /// Acquire the address via DHCP; otherwise `static_ipv4` is applied
    pub use_dhcp: bool,
    /// Request DHCP rapid commit (two-message exchange)
    pub dhcp_rapid_commit: bool,
    /// DHCP hostname; derived from the MAC when unset
    pub dhcp_hostname: Option<heapless::String<32>>,
    /// Manual configuration used when DHCP is disabled
    pub static_ipv4: Option<StaticIpv4>,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            interface_name: hstr("eth0"),
            mac_address: hstr("00-AB-CD-EF-02-07"),
            use_dhcp: true,
            dhcp_rapid_commit: false,
            dhcp_hostname: None,
            static_ipv4: None,
        }
    }
}

/// Manual IPv4 settings in dotted text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticIpv4 {
    pub address: heapless::String<15>,
    pub prefix_len: u8,
    pub gateway: heapless::String<15>,
    #[serde(default)]
    pub dns: Option<heapless::String<15>>,
}

/// Parsed form of [`StaticIpv4`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticIpv4Settings {
    pub address: Ipv4Addr,
    pub prefix_len: u8,
    pub gateway: Ipv4Addr,
    pub dns: Option<Ipv4Addr>,
}

/// Echo client behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoConfig {
    /// Echo server IPv4 address
    pub server_host: heapless::String<15>,
    /// Echo server TCP port
    pub server_port: u16,
    /// Receive buffer size in bytes (one segment at most)
    pub rx_buffer_len: usize,
    /// Wait between non-blocking receive attempts (milliseconds)
    pub poll_interval_ms: u32,
    /// Receive attempts before the session gives up
    pub max_polls: u32,
    /// Connect timeout (milliseconds)
    pub connect_timeout_ms: u32,
    /// Pause between sessions (milliseconds)
    pub session_interval_ms: u32,
}

/// Largest receive buffer accepted; one Ethernet TCP segment.
pub const MAX_RX_BUFFER_LEN: usize = 1460;

/// Longest hostname the board's DHCP client carries.
pub const MAX_DHCP_HOSTNAME_LEN: usize = 30;

/// Upper bound on the heartbeat half period: one hour.
pub const MAX_HALF_PERIOD_MS: u32 = 3_600_000;

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            server_host: hstr("192.168.117.103"),
            server_port: 23,
            rx_buffer_len: 256,
            poll_interval_ms: 100,
            max_polls: 600, // 60 s at the default poll interval
            connect_timeout_ms: 5000,
            session_interval_ms: 100,
        }
    }
}

/// Status LED blink timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    /// Time the LED spends in each state (milliseconds)
    pub half_period_ms: u32,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            half_period_ms: 5000,
        }
    }
}

/// RTOS task parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub stack_kb: usize,
    pub priority: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub led: TaskSpec,
    pub user: TaskSpec,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            led: TaskSpec {
                stack_kb: 3,
                priority: 5,
            },
            user: TaskSpec {
                stack_kb: 8,
                priority: 5,
            },
        }
    }
}

fn parse_ipv4(s: &str, field: &'static str) -> Result<Ipv4Addr, ConfigError> {
    s.parse().map_err(|_| ConfigError::ValidationFailed(field))
}

impl SystemConfig {
    /// Parse a JSON document and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the firmware cannot run with.  Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let net = &self.net;
        if net.interface_name.is_empty() {
            return Err(ConfigError::ValidationFailed("net.interface_name is empty"));
        }
        mac::parse_mac(&net.mac_address)
            .map_err(|_| ConfigError::ValidationFailed("net.mac_address is not a MAC address"))?;
        if let Some(name) = &net.dhcp_hostname {
            if name.is_empty() {
                return Err(ConfigError::ValidationFailed("net.dhcp_hostname is empty"));
            }
            if name.len() > MAX_DHCP_HOSTNAME_LEN {
                return Err(ConfigError::ValidationFailed("net.dhcp_hostname is too long"));
            }
        }
        match &net.static_ipv4 {
            Some(_) => {
                self.static_ipv4()?;
            }
            None if !net.use_dhcp => {
                return Err(ConfigError::ValidationFailed(
                    "net.static_ipv4 is required when DHCP is disabled",
                ));
            }
            None => {}
        }

        let echo = &self.echo;
        self.server_addr()?;
        if echo.server_port == 0 {
            return Err(ConfigError::ValidationFailed("echo.server_port must be non-zero"));
        }
        if echo.rx_buffer_len == 0 || echo.rx_buffer_len > MAX_RX_BUFFER_LEN {
            return Err(ConfigError::ValidationFailed("echo.rx_buffer_len out of range"));
        }
        if echo.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("echo.poll_interval_ms must be non-zero"));
        }
        if echo.max_polls == 0 {
            return Err(ConfigError::ValidationFailed("echo.max_polls must be non-zero"));
        }
        if echo.connect_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("echo.connect_timeout_ms must be non-zero"));
        }

        if self.heartbeat.half_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("heartbeat.half_period_ms must be non-zero"));
        }
        if self.heartbeat.half_period_ms > MAX_HALF_PERIOD_MS {
            return Err(ConfigError::ValidationFailed("heartbeat.half_period_ms exceeds one hour"));
        }
        if self.tasks.led.stack_kb == 0 || self.tasks.user.stack_kb == 0 {
            return Err(ConfigError::ValidationFailed("tasks stack_kb must be non-zero"));
        }
        Ok(())
    }

    /// Echo server address.
    pub fn server_addr(&self) -> Result<SocketAddrV4, ConfigError> {
        let ip = parse_ipv4(&self.echo.server_host, "echo.server_host is not an IPv4 address")?;
        Ok(SocketAddrV4::new(ip, self.echo.server_port))
    }

    /// Host MAC address.
    pub fn mac(&self) -> Result<MacAddress, ConfigError> {
        mac::parse_mac(&self.net.mac_address)
            .map_err(|_| ConfigError::ValidationFailed("net.mac_address is not a MAC address"))
    }

    /// Parsed manual IPv4 settings, `None` if none are configured.
    pub fn static_ipv4(&self) -> Result<Option<StaticIpv4Settings>, ConfigError> {
        let Some(s) = &self.net.static_ipv4 else {
            return Ok(None);
        };
        if s.prefix_len > 32 {
            return Err(ConfigError::ValidationFailed("net.static_ipv4.prefix_len exceeds 32"));
        }
        let dns = match &s.dns {
            Some(d) => Some(parse_ipv4(d, "net.static_ipv4.dns is not an IPv4 address")?),
            None => None,
        };
        Ok(Some(StaticIpv4Settings {
            address: parse_ipv4(&s.address, "net.static_ipv4.address is not an IPv4 address")?,
            prefix_len: s.prefix_len,
            gateway: parse_ipv4(&s.gateway, "net.static_ipv4.gateway is not an IPv4 address")?,
            dns,
        }))
    }

    /// Hostname announced by the DHCP client.
    pub fn dhcp_hostname(&self) -> Result<heapless::String<32>, ConfigError> {
        if let Some(name) = &self.net.dhcp_hostname {
            return Ok(name.clone());
        }
        let mac = self.mac()?;
        Ok(hstr(&mac::hostname(&mac)))
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// JSON document baked in at build time, if any.
const EMBEDDED_CONFIG: Option<&str> = option_env!("TCPECHO_CONFIG_JSON");

/// Pick the first source that parses and validates.
///
/// Order: `file` (host override) → `embedded` → defaults.
pub fn load_from(file: Option<&str>, embedded: Option<&str>) -> SystemConfig {
    for (label, doc) in [("file", file), ("embedded", embedded)] {
        let Some(doc) = doc else { continue };
        match SystemConfig::from_json(doc) {
            Ok(cfg) => {
                info!("Config loaded from {} source", label);
                return cfg;
            }
            Err(e) => warn!("Config from {} source rejected ({}), trying next", label, e),
        }
    }
    info!("Config: using defaults");
    SystemConfig::default()
}

/// Load the runtime configuration.
#[cfg(target_os = "espidf")]
pub fn load() -> SystemConfig {
    load_from(None, EMBEDDED_CONFIG)
}

/// Load the runtime configuration, honouring `TCPECHO_CONFIG`.
#[cfg(not(target_os = "espidf"))]
pub fn load() -> SystemConfig {
    load_with_file(std::env::var("TCPECHO_CONFIG").ok().as_deref())
}

/// Host loader: an unreadable file is logged and skipped.
#[cfg(not(target_os = "espidf"))]
pub fn load_with_file(path: Option<&str>) -> SystemConfig {
    let file = path.and_then(|path| {
        std::fs::read_to_string(path)
            .map_err(|e| warn!("Config file '{}' unreadable: {}", path, e))
            .ok()
    });
    load_from(file.as_deref(), EMBEDDED_CONFIG)
}
