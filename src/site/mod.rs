// ABOUTME: The site record assembled from operator input.
// ABOUTME: Holds raw parameter text so invalid input can still be rendered.

use std::fmt;
use std::path::PathBuf;

use crate::types::{SiteKind, derive_host_name};

/// Default certificate chain offered when the operator gives none.
pub const DEFAULT_FULLCHAIN_PATH: &str = "/opt/certs/fullchain.pem";
/// Default private key offered when the operator gives none.
pub const DEFAULT_PRIVKEY_PATH: &str = "/opt/certs/privkey.pem";

/// A parameter of a site record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SiteName,
    SiteHostName,
    SiteKind,
    UpstreamHost,
    UpstreamPort,
    UpstreamProtocol,
    FullchainPath,
    PrivkeyPath,
}

impl Field {
    /// Question shown when the value is collected interactively.
    pub fn prompt(&self) -> &'static str {
        match self {
            Field::SiteName => "Enter the full site name (e.g., www.example.com)",
            Field::SiteHostName => "Enter the site host name",
            Field::SiteKind => "Is this a proxy or local site? (proxy/local)",
            Field::UpstreamHost => "Enter the upstream hostname or IP",
            Field::UpstreamPort => "Enter the upstream port",
            Field::UpstreamProtocol => "Use http or https for proxy_pass? (http/https)",
            Field::FullchainPath => "Enter the fullchain certificate path",
            Field::PrivkeyPath => "Enter the private key path",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::SiteName => "site name",
            Field::SiteHostName => "site host name",
            Field::SiteKind => "site kind",
            Field::UpstreamHost => "upstream host",
            Field::UpstreamPort => "upstream port",
            Field::UpstreamProtocol => "upstream protocol",
            Field::FullchainPath => "fullchain path",
            Field::PrivkeyPath => "private key path",
        };
        f.write_str(name)
    }
}

/// Where a proxy site forwards its traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Upstream {
    pub host: String,
    pub port: String,
    pub protocol: String,
}

impl Upstream {
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            protocol: protocol.into(),
        }
    }
}

/// Everything needed to render one site's configuration.
///
/// Fields hold the operator's text as given. Checking it is the
/// validator's job; a record with outstanding violations can still be
/// rendered and written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRecord {
    site_name: String,
    site_host_name: String,
    kind: String,
    upstream: Option<Upstream>,
    pub fullchain_path: PathBuf,
    pub privkey_path: PathBuf,
}

impl SiteRecord {
    /// Assemble a record, keeping upstream fields only for proxy sites.
    pub fn assemble(
        site_name: impl Into<String>,
        kind: impl Into<String>,
        upstream: Option<Upstream>,
        fullchain_path: impl Into<PathBuf>,
        privkey_path: impl Into<PathBuf>,
    ) -> Self {
        let site_name = site_name.into().trim().to_string();
        let kind = kind.into().trim().to_string();
        let upstream = match kind.parse::<SiteKind>() {
            Ok(SiteKind::Proxy) => Some(upstream.unwrap_or_default()),
            _ => None,
        };

        Self {
            site_host_name: derive_host_name(&site_name).to_string(),
            site_name,
            kind,
            upstream,
            fullchain_path: fullchain_path.into(),
            privkey_path: privkey_path.into(),
        }
    }

    pub fn proxy(
        site_name: impl Into<String>,
        upstream: Upstream,
        fullchain_path: impl Into<PathBuf>,
        privkey_path: impl Into<PathBuf>,
    ) -> Self {
        Self::assemble(site_name, "proxy", Some(upstream), fullchain_path, privkey_path)
    }

    pub fn local(
        site_name: impl Into<String>,
        fullchain_path: impl Into<PathBuf>,
        privkey_path: impl Into<PathBuf>,
    ) -> Self {
        Self::assemble(site_name, "local", None, fullchain_path, privkey_path)
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn site_host_name(&self) -> &str {
        &self.site_host_name
    }

    /// The kind exactly as the operator gave it.
    pub fn kind_text(&self) -> &str {
        &self.kind
    }

    /// The recognized kind, if the operator named one.
    pub fn kind(&self) -> Option<SiteKind> {
        self.kind.parse().ok()
    }

    /// Upstream settings; `Some` exactly when the kind is proxy.
    pub fn upstream(&self) -> Option<&Upstream> {
        self.upstream.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_name_follows_site_name() {
        let record = SiteRecord::local(" teste.example.com ", "/a", "/b");
        assert_eq!(record.site_name(), "teste.example.com");
        assert_eq!(record.site_host_name(), "teste");
    }

    #[test]
    fn local_records_drop_upstream() {
        let record = SiteRecord::assemble(
            "web.example.com",
            "LOCAL",
            Some(Upstream::new("10.0.0.1", "80", "http")),
            "/a",
            "/b",
        );
        assert_eq!(record.kind(), Some(SiteKind::Local));
        assert!(record.upstream().is_none());
    }

    #[test]
    fn proxy_records_always_carry_upstream() {
        let record = SiteRecord::assemble("web.example.com", "proxy", None, "/a", "/b");
        assert_eq!(record.upstream(), Some(&Upstream::default()));
    }

    #[test]
    fn unknown_kind_keeps_text() {
        let record = SiteRecord::assemble("web.example.com", "static", None, "/a", "/b");
        assert_eq!(record.kind(), None);
        assert_eq!(record.kind_text(), "static");
        assert!(record.upstream().is_none());
    }
}
