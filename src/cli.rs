// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use nxsite::input::SiteParams;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nxsite")]
#[command(about = "Create, enable and disable nginx site configurations")]
#[command(version)]
pub struct Cli {
    /// Nginx configuration directory (default: /etc/nginx)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Settings file (default: $NXSITE_SETTINGS or /etc/nxsite/settings.yml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print results and errors
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a site configuration in sites-available, named after the host
    /// (teste.conf for teste.example.com), then optionally enable it
    Create(CreateArgs),

    /// Enable a site by linking it into sites-enabled, then reload nginx
    Enable {
        /// Site host name (e.g. teste)
        site: String,

        /// Reload without prompting if the site is already enabled
        #[arg(short, long)]
        force: bool,
    },

    /// Disable a site by removing its link from sites-enabled, then reload nginx
    Disable {
        /// Site host name (e.g. teste)
        site: String,
    },
}

#[derive(Args)]
pub struct CreateArgs {
    /// Full site name (e.g. www.example.com)
    #[arg(long)]
    pub site_name: Option<String>,

    /// Site type: proxy or local
    #[arg(long)]
    pub site_type: Option<String>,

    /// Upstream hostname or IP for proxy sites
    #[arg(long)]
    pub upstream_host: Option<String>,

    /// Upstream port for proxy sites
    #[arg(long)]
    pub upstream_port: Option<String>,

    /// Protocol used to reach the upstream: http or https
    #[arg(long)]
    pub proxy_protocol: Option<String>,

    /// Fullchain certificate file (default: /opt/certs/fullchain.pem)
    #[arg(long)]
    pub fullchain_path: Option<String>,

    /// Private key file (default: /opt/certs/privkey.pem)
    #[arg(long)]
    pub privkey_path: Option<String>,

    /// Never prompt; missing values fall back to defaults or stay empty
    #[arg(long)]
    pub non_interactive: bool,
}

impl CreateArgs {
    pub fn params(&self) -> SiteParams {
        SiteParams {
            site_name: self.site_name.clone(),
            site_kind: self.site_type.clone(),
            upstream_host: self.upstream_host.clone(),
            upstream_port: self.upstream_port.clone(),
            upstream_protocol: self.proxy_protocol.clone(),
            fullchain_path: self.fullchain_path.clone(),
            privkey_path: self.privkey_path.clone(),
        }
    }
}
