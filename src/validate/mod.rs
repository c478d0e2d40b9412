// ABOUTME: Site record validation.
// ABOUTME: Collects every violation in one pass instead of stopping at the first.

mod predicates;

pub use predicates::{has_whitespace, is_domain_like, is_ip_address, parse_port};

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::site::{Field, SiteRecord};
use crate::types::{HostName, HostNameError, SiteKind, UpstreamProtocol};

/// One of the two TLS files every site needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Certificate {
    Fullchain,
    Privkey,
}

impl Certificate {
    pub fn field(&self) -> Field {
        match self {
            Certificate::Fullchain => Field::FullchainPath,
            Certificate::Privkey => Field::PrivkeyPath,
        }
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Certificate::Fullchain => f.write_str("certificate"),
            Certificate::Privkey => f.write_str("private key"),
        }
    }
}

/// A broken rule in a site record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("site name is empty")]
    SiteNameEmpty,

    #[error("invalid site name format '{0}' (must be a valid domain, e.g., www.example.com)")]
    SiteNameFormat(String),

    #[error(transparent)]
    HostName(#[from] HostNameError),

    #[error("site kind must be 'proxy' or 'local', got '{0}'")]
    UnknownKind(String),

    #[error("upstream hostname or IP is empty")]
    UpstreamHostEmpty,

    #[error("upstream hostname or IP '{0}' contains whitespace")]
    UpstreamHostWhitespace(String),

    #[error("upstream port is empty")]
    UpstreamPortEmpty,

    #[error("upstream port must be a number between 1 and 65535, got '{0}'")]
    UpstreamPortRange(String),

    #[error("protocol must be 'http' or 'https', got '{0}'")]
    UpstreamProtocol(String),

    #[error("{0} path is empty")]
    PathEmpty(Certificate),

    #[error("{} file {} does not exist", .0, .1.display())]
    PathMissing(Certificate, PathBuf),

    #[error("{} path {} is not a valid file", .0, .1.display())]
    PathNotFile(Certificate, PathBuf),
}

impl Violation {
    /// The single field this violation is about.
    pub fn field(&self) -> Field {
        match self {
            Violation::SiteNameEmpty | Violation::SiteNameFormat(_) => Field::SiteName,
            Violation::HostName(_) => Field::SiteHostName,
            Violation::UnknownKind(_) => Field::SiteKind,
            Violation::UpstreamHostEmpty | Violation::UpstreamHostWhitespace(_) => {
                Field::UpstreamHost
            }
            Violation::UpstreamPortEmpty | Violation::UpstreamPortRange(_) => Field::UpstreamPort,
            Violation::UpstreamProtocol(_) => Field::UpstreamProtocol,
            Violation::PathEmpty(cert)
            | Violation::PathMissing(cert, _)
            | Violation::PathNotFile(cert, _) => cert.field(),
        }
    }
}

/// Check a record against every site rule.
///
/// Never mutates the record and never fails; an empty list means the
/// record is valid. The certificate paths are stat'ed, not opened.
pub fn validate(record: &SiteRecord) -> Vec<Violation> {
    let mut violations = Vec::new();

    violations.extend(check_site_name(record.site_name()));

    if let Err(e) = HostName::new(record.site_host_name()) {
        violations.push(Violation::HostName(e));
    }

    match record.kind() {
        Some(SiteKind::Proxy) => {
            if let Some(upstream) = record.upstream() {
                violations.extend(check_upstream_host(&upstream.host));
                violations.extend(check_upstream_port(&upstream.port));
                violations.extend(check_upstream_protocol(&upstream.protocol));
            }
        }
        Some(SiteKind::Local) => {}
        None => violations.push(Violation::UnknownKind(record.kind_text().to_string())),
    }

    violations.extend(check_certificate(Certificate::Fullchain, &record.fullchain_path));
    violations.extend(check_certificate(Certificate::Privkey, &record.privkey_path));

    violations
}

pub fn check_site_name(site_name: &str) -> Option<Violation> {
    if site_name.is_empty() {
        Some(Violation::SiteNameEmpty)
    } else if !is_domain_like(site_name) {
        Some(Violation::SiteNameFormat(site_name.to_string()))
    } else {
        None
    }
}

fn check_upstream_host(host: &str) -> Option<Violation> {
    if host.is_empty() {
        Some(Violation::UpstreamHostEmpty)
    } else if has_whitespace(host) {
        Some(Violation::UpstreamHostWhitespace(host.to_string()))
    } else {
        None
    }
}

fn check_upstream_port(port: &str) -> Option<Violation> {
    if port.trim().is_empty() {
        Some(Violation::UpstreamPortEmpty)
    } else if parse_port(port).is_none() {
        Some(Violation::UpstreamPortRange(port.to_string()))
    } else {
        None
    }
}

fn check_upstream_protocol(protocol: &str) -> Option<Violation> {
    match protocol.parse::<UpstreamProtocol>() {
        Ok(_) => None,
        Err(()) => Some(Violation::UpstreamProtocol(protocol.to_string())),
    }
}

fn check_certificate(cert: Certificate, path: &Path) -> Option<Violation> {
    if path.as_os_str().is_empty() {
        return Some(Violation::PathEmpty(cert));
    }

    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Some(Violation::PathNotFile(cert, path.to_path_buf())),
        Ok(_) => None,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Some(Violation::PathMissing(cert, path.to_path_buf()))
        }
        Err(_) => Some(Violation::PathNotFile(cert, path.to_path_buf())),
    }
}
