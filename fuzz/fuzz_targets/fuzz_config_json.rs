//! Fuzz target: configuration document parser
//!
//! Feeds arbitrary bytes to `SystemConfig::from_json` and verifies:
//! - No panics on malformed UTF-8 or JSON
//! - Every accepted document passes `validate()` again
//! - Every accepted document yields the derived values startup relies on
//!   (server address, MAC, DHCP hostname, echo client)
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use tcpecho::app::echo::EchoClient;
use tcpecho::config::SystemConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(cfg) = SystemConfig::from_json(doc) else {
        return;
    };

    assert!(cfg.validate().is_ok());
    assert!(cfg.server_addr().is_ok());
    assert!(cfg.mac().is_ok());
    assert!(cfg.dhcp_hostname().is_ok());
    assert!(cfg.static_ipv4().is_ok());
    if !cfg.net.use_dhcp {
        assert!(matches!(cfg.static_ipv4(), Ok(Some(_))));
    }
    assert!(EchoClient::from_config(&cfg).is_ok());
});
