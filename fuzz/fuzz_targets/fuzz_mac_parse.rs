//! Fuzz target: MAC address text parser
//!
//! Any string `parse_mac` accepts must format to the canonical
//! `XX-XX-XX-XX-XX-XX` form and parse back to the same bytes.
//!
//! cargo fuzz run fuzz_mac_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use tcpecho::mac::{format_mac, parse_mac};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(mac) = parse_mac(s) {
        let canonical = format_mac(&mac);
        assert_eq!(canonical.len(), 17);
        assert_eq!(parse_mac(&canonical), Ok(mac));
    }
});
