//! Ethernet MAC address helpers.
//!
//! The board has no factory MAC for the external PHY path, so the address is
//! configured as text (`00-AB-CD-EF-02-07`) and parsed once at startup.  The
//! same address seeds the DHCP hostname (`tcpecho-xxyyzz`).

use core::fmt::Write;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Canonical text form, `XX-XX-XX-XX-XX-XX` (17 chars).
pub type MacString = heapless::String<17>;

/// Errors from [`parse_mac`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacParseError {
    /// Not six octets separated by `-` or `:`.
    BadLayout,
    /// An octet is not exactly two hex digits.
    BadOctet,
}

impl core::fmt::Display for MacParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadLayout => write!(f, "expected six octets separated by '-' or ':'"),
            Self::BadOctet => write!(f, "octet is not two hex digits"),
        }
    }
}

/// Parse `00-AB-CD-EF-02-07` or `00:ab:cd:ef:02:07`.
///
/// Both separators are accepted but must not be mixed.
pub fn parse_mac(s: &str) -> Result<MacAddress, MacParseError> {
    let sep = if s.contains('-') { '-' } else { ':' };
    let other = if sep == '-' { ':' } else { '-' };
    if s.contains(other) {
        return Err(MacParseError::BadLayout);
    }

    let mut mac = [0u8; 6];
    let mut count = 0;
    for part in s.split(sep) {
        if count == mac.len() {
            return Err(MacParseError::BadLayout);
        }
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(MacParseError::BadOctet);
        }
        mac[count] = u8::from_str_radix(part, 16).map_err(|_| MacParseError::BadOctet)?;
        count += 1;
    }
    if count != mac.len() {
        return Err(MacParseError::BadLayout);
    }
    Ok(mac)
}

/// Format as `XX-XX-XX-XX-XX-XX` (uppercase, dash separated).
pub fn format_mac(mac: &MacAddress) -> MacString {
    let mut s = MacString::new();
    let _ = write!(
        s,
        "{:02X}-{:02X}-{:02X}-{:02X}-{:02X}-{:02X}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    );
    s
}

/// Derive the DHCP hostname from the last 3 MAC bytes.
/// Format: `tcpecho-xxyyzz` (lowercase).
pub fn hostname(mac: &MacAddress) -> heapless::String<24> {
    let mut name = heapless::String::<24>::new();
    let _ = write!(name, "tcpecho-{:02x}{:02x}{:02x}", mac[3], mac[4], mac[5]);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dash_form() {
        assert_eq!(
            parse_mac("00-AB-CD-EF-02-07"),
            Ok([0x00, 0xAB, 0xCD, 0xEF, 0x02, 0x07])
        );
    }

    #[test]
    fn parses_colon_form_lowercase() {
        assert_eq!(
            parse_mac("de:ad:be:ef:ca:fe"),
            Ok([0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE])
        );
    }

    #[test]
    fn rejects_mixed_separators() {
        assert_eq!(parse_mac("00-AB:CD-EF-02-07"), Err(MacParseError::BadLayout));
    }

    #[test]
    fn rejects_wrong_octet_count() {
        assert_eq!(parse_mac("00-AB-CD-EF-02"), Err(MacParseError::BadLayout));
        assert_eq!(parse_mac("00-AB-CD-EF-02-07-08"), Err(MacParseError::BadLayout));
        assert_eq!(parse_mac(""), Err(MacParseError::BadOctet));
    }

    #[test]
    fn rejects_bad_octets() {
        assert_eq!(parse_mac("0-AB-CD-EF-02-07"), Err(MacParseError::BadOctet));
        assert_eq!(parse_mac("GG-AB-CD-EF-02-07"), Err(MacParseError::BadOctet));
        assert_eq!(parse_mac("+1-AB-CD-EF-02-07"), Err(MacParseError::BadOctet));
    }

    #[test]
    fn format_is_uppercase_dashed() {
        let mac = [0x00, 0xab, 0xcd, 0xef, 0x02, 0x07];
        assert_eq!(format_mac(&mac).as_str(), "00-AB-CD-EF-02-07");
    }

    #[test]
    fn hostname_format() {
        let mac = [0x00, 0x11, 0x22, 0xAA, 0xBB, 0xCC];
        assert_eq!(hostname(&mac).as_str(), "tcpecho-aabbcc");
    }
}
