// ABOUTME: The single enable code path shared by the create and enable flows.
// ABOUTME: Checks the artifact, tests the config, then links without ever relinking.

use crate::error::{Error, Result, Stage};
use crate::gateway::{CommandRunner, Gateway};
use crate::store::{LinkState, SiteStore};
use crate::types::HostName;

use super::state::LinkOutcome;

/// Links a site into `sites-enabled` and verifies the server accepts it.
pub struct Enabler<'a, R> {
    store: &'a SiteStore,
    gateway: &'a Gateway<R>,
}

impl<'a, R: CommandRunner> Enabler<'a, R> {
    pub fn new(store: &'a SiteStore, gateway: &'a Gateway<R>) -> Self {
        Self { store, gateway }
    }

    /// Ensure the enablement link for `host` is in place.
    ///
    /// The config test runs before any mutation. An existing link is only
    /// accepted if it resolves to this site's artifact.
    ///
    /// # Errors
    ///
    /// - `Error::ArtifactNotFound` if `sites-available` has no file for `host`.
    /// - `Error::ExternalCommandFailed` if the config test fails (nothing changed).
    /// - `Error::LinkConflict` if the enabled path holds anything else.
    /// - `Error::LinkCreate` if the symlink cannot be created.
    pub async fn link(&self, host: &HostName) -> Result<LinkOutcome> {
        let available = self.store.available_path(host);
        if !available.exists() {
            return Err(Error::ArtifactNotFound(available));
        }

        self.gateway.test_config(Stage::ConfigTest).await?;

        let conflict = |found: String| Error::LinkConflict {
            link: self.store.enabled_path(host),
            expected: available.clone(),
            found,
        };

        match self.store.link_state(host)? {
            LinkState::Absent => {
                self.store.create_link(host)?;
                Ok(LinkOutcome::Created)
            }
            LinkState::Enabled => Ok(LinkOutcome::AlreadyEnabled),
            LinkState::Conflicting(target) => Err(conflict(target.display().to_string())),
            LinkState::NotALink => Err(conflict("a file that is not a symbolic link".to_string())),
        }
    }

    /// Re-run the config test with the site linked.
    ///
    /// A failure leaves the link in place so the cause stays visible.
    pub async fn verify(&self) -> Result<()> {
        self.gateway.test_config(Stage::PostEnableTest).await
    }
}
