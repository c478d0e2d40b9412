// ABOUTME: Settings for nxsite, parsed from YAML.
// ABOUTME: Handles discovery through flag, environment and system path, with built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::gateway::ServerCommands;
use crate::site::{DEFAULT_FULLCHAIN_PATH, DEFAULT_PRIVKEY_PATH};

pub const SETTINGS_ENV: &str = "NXSITE_SETTINGS";
pub const SYSTEM_SETTINGS_PATH: &str = "/etc/nxsite/settings.yml";
pub const DEFAULT_CONFIG_DIR: &str = "/etc/nginx";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Server configuration directory holding `sites-available` and `sites-enabled`.
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    #[serde(default)]
    pub commands: ServerCommands,

    #[serde(default)]
    pub certificates: CertificateDefaults,
}

/// Certificate paths offered when the operator gives none.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertificateDefaults {
    #[serde(default = "default_fullchain")]
    pub fullchain: PathBuf,
    #[serde(default = "default_privkey")]
    pub privkey: PathBuf,
}

fn default_config_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_DIR)
}

fn default_fullchain() -> PathBuf {
    PathBuf::from(DEFAULT_FULLCHAIN_PATH)
}

fn default_privkey() -> PathBuf {
    PathBuf::from(DEFAULT_PRIVKEY_PATH)
}

impl Default for CertificateDefaults {
    fn default() -> Self {
        Self {
            fullchain: default_fullchain(),
            privkey: default_privkey(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            commands: ServerCommands::default(),
            certificates: CertificateDefaults::default(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Settings(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Find the settings to use.
    ///
    /// Order: `explicit` (from `--settings`), then `$NXSITE_SETTINGS`, then
    /// the system settings file if present, then built-in defaults. An
    /// explicitly named file that cannot be read is an error.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        Self::discover_with_system(explicit, Path::new(SYSTEM_SETTINGS_PATH))
    }

    fn discover_with_system(explicit: Option<&Path>, system: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Some(path) = std::env::var_os(SETTINGS_ENV).filter(|p| !p.is_empty()) {
            return Self::load(Path::new(&path));
        }

        if system.is_file() {
            return Self::load(system);
        }

        tracing::debug!("no settings file found, using defaults");
        Ok(Self::default())
    }
}
