// ABOUTME: Short host name used as the per-site file, log and upstream key.
// ABOUTME: Derived from the first label of the full site name.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostNameError {
    #[error("site host name could not be extracted from site name")]
    Empty,

    #[error("site host name exceeds maximum length of 63 characters")]
    TooLong,

    #[error("site host name cannot start or end with a hyphen")]
    EdgeHyphen,

    #[error("invalid character in site host name: '{0}'")]
    InvalidChar(char),
}

/// The short identifier of a site: `teste` for `teste.example.com`.
///
/// A `HostName` is always safe to use as a file stem inside the
/// `sites-available` and `sites-enabled` directories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostName(String);

impl HostName {
    pub fn new(value: &str) -> Result<Self, HostNameError> {
        if value.is_empty() {
            return Err(HostNameError::Empty);
        }

        if value.len() > 63 {
            return Err(HostNameError::TooLong);
        }

        if value.starts_with('-') || value.ends_with('-') {
            return Err(HostNameError::EdgeHyphen);
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
                return Err(HostNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    /// Derive the host name from a full site name.
    pub fn from_site_name(site_name: &str) -> Result<Self, HostNameError> {
        Self::new(derive_host_name(site_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the site's artifact and link: `<host>.conf`.
    pub fn file_name(&self) -> String {
        format!("{}.conf", self.0)
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// First dot-separated label of a site name, trimmed.
pub fn derive_host_name(site_name: &str) -> &str {
    site_name.trim().split('.').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_first_label() {
        assert_eq!(derive_host_name("teste.example.com"), "teste");
        assert_eq!(derive_host_name("localhost"), "localhost");
        assert_eq!(derive_host_name(""), "");
        assert_eq!(derive_host_name(".example.com"), "");
    }

    #[test]
    fn file_name_appends_conf() {
        let host = HostName::new("teste").unwrap();
        assert_eq!(host.file_name(), "teste.conf");
    }

    #[test]
    fn rejects_path_components() {
        assert_eq!(
            HostName::new("../etc").unwrap_err(),
            HostNameError::InvalidChar('.')
        );
        assert_eq!(
            HostName::new("a/b").unwrap_err(),
            HostNameError::InvalidChar('/')
        );
    }

    #[test]
    fn rejects_empty_and_edge_hyphens() {
        assert_eq!(HostName::new("").unwrap_err(), HostNameError::Empty);
        assert_eq!(HostName::new("-web").unwrap_err(), HostNameError::EdgeHyphen);
        assert_eq!(
            HostName::from_site_name(".example.com").unwrap_err(),
            HostNameError::Empty
        );
    }
}
