// ABOUTME: Pure predicates behind the site validation rules.
// ABOUTME: No filesystem or process access; each rule is testable alone.

use std::net::IpAddr;

/// Domain-like name: label characters `[A-Za-z0-9.-]`, at least one dot,
/// and a top-level label of two or more ASCII letters.
pub fn is_domain_like(name: &str) -> bool {
    let Some((head, tld)) = name.rsplit_once('.') else {
        return false;
    };

    !head.is_empty()
        && head
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn has_whitespace(value: &str) -> bool {
    value.chars().any(char::is_whitespace)
}

/// Parse a TCP port in `1..=65535`.
pub fn parse_port(value: &str) -> Option<u16> {
    match value.trim().parse::<u32>() {
        Ok(port) if (1..=65535).contains(&port) => u16::try_from(port).ok(),
        _ => None,
    }
}

/// IPv4 or IPv6 literal. Anything else has to be resolved by the server.
pub fn is_ip_address(value: &str) -> bool {
    value.trim().parse::<IpAddr>().is_ok()
}
