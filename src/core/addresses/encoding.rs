// Shared address validation and encoding helpers.
//
// Every code path that stores or compares an address goes through these.
// Ranges are compared on a single u128 keyspace: IPv6 addresses use their
// native 128-bit value, IPv4 addresses map through `to_ipv6_mapped()`
// (::ffff:a.b.c.d). The two families therefore occupy disjoint regions and
// an IPv4 range can never capture an IPv6 address or vice versa.

use std::net::IpAddr;

/// Parse a textual address into an `IpAddr`, trimming surrounding
/// whitespace. Returns `None` for anything that is not a well-formed IPv4 or
/// IPv6 literal.
pub fn parse_address(text: &str) -> Option<IpAddr> {
    text.trim().parse().ok()
}

/// Canonical unsigned encoding of an address, used for range containment.
/// Must be the same function at insertion time and query time.
pub fn encode_address(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(v4) => u128::from(v4.to_ipv6_mapped()),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

/// Normalize a country code: trim, require exactly two ASCII letters,
/// uppercase. Returns `None` for anything else.
pub fn normalize_iso(code: &str) -> Option<String> {
    let trimmed = code.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(trimmed.to_ascii_uppercase())
    } else {
        None
    }
}
