// ABOUTME: Site kind and upstream protocol enums.
// ABOUTME: Parsed case-insensitively from operator input.

use std::fmt;
use std::str::FromStr;

/// Which template a site is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    /// Reverse-proxies to an upstream server.
    Proxy,
    /// Serves static files from a per-host document root.
    Local,
}

impl SiteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteKind::Proxy => "proxy",
            SiteKind::Local => "local",
        }
    }
}

impl FromStr for SiteKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proxy" => Ok(SiteKind::Proxy),
            "local" => Ok(SiteKind::Local),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheme used in the `proxy_pass` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamProtocol {
    Http,
    Https,
}

impl UpstreamProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamProtocol::Http => "http",
            UpstreamProtocol::Https => "https",
        }
    }
}

impl FromStr for UpstreamProtocol {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(UpstreamProtocol::Http),
            "https" => Ok(UpstreamProtocol::Https),
            _ => Err(()),
        }
    }
}

impl fmt::Display for UpstreamProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
