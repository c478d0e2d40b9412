// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: Host names, site kinds and upstream protocols.

mod host_name;
mod site_kind;

pub use host_name::{HostName, HostNameError, derive_host_name};
pub use site_kind::{SiteKind, UpstreamProtocol};
