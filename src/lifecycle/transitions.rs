// ABOUTME: State transition methods for the site create flow.
// ABOUTME: Each method consumes self and returns the next state on success.

use nonempty::NonEmpty;

use crate::error::{Error, Result};
use crate::gateway::{CommandRunner, Gateway};
use crate::render::{braces_balanced, render};
use crate::store::{SiteConfigArtifact, SiteStore};
use crate::types::SiteKind;
use crate::validate::{Violation, validate};

use super::enable::Enabler;
use super::site::Site;
use super::state::{
    Drafted, Enabled, Invalid, LinkOutcome, Reloaded, Rendered, Requested, Validated, Written,
};

/// Result of validation: either state can continue, down different paths.
pub type ValidationResult = std::result::Result<Site<Validated>, Site<Invalid>>;

impl<S> Site<S> {
    fn build_artifact(&self, store: &SiteStore, kind: SiteKind) -> SiteConfigArtifact {
        SiteConfigArtifact {
            path: store.available_path(&self.host),
            text: render(&self.record, kind),
        }
    }
}

// =============================================================================
// Requested -> Validated | Invalid
// =============================================================================

impl Site<Requested> {
    /// Check the record against every rule.
    pub fn validate(self) -> ValidationResult {
        let violations = validate(&self.record);
        match (NonEmpty::from_vec(violations), self.record.kind()) {
            (None, Some(kind)) => Ok(self.transition(Validated { kind })),
            (Some(violations), _) => Err(self.transition(Invalid { violations })),
            // validate() already reports an unrecognized kind
            (None, None) => {
                let kind = self.record.kind_text().to_string();
                Err(self.transition(Invalid {
                    violations: NonEmpty::new(Violation::UnknownKind(kind)),
                }))
            }
        }
    }
}

// =============================================================================
// Invalid -> Drafted
// =============================================================================

impl Site<Invalid> {
    /// Write the artifact anyway so the file on disk reflects current intent.
    ///
    /// An unrecognized kind is drafted with the local template. The text
    /// is written unchecked; a draft is never enabled by this run.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileWrite` if the file cannot be written.
    pub fn write_draft(self, store: &SiteStore) -> Result<Site<Drafted>> {
        let kind = self.record.kind().unwrap_or(SiteKind::Local);
        let artifact = self.build_artifact(store, kind);
        store.write_artifact(&artifact)?;

        tracing::info!(
            host = %self.host,
            violations = self.state.violations.len(),
            "wrote site configuration with outstanding violations"
        );

        let violations = self.state.violations.clone();
        Ok(self.transition(Drafted {
            path: artifact.path,
            violations,
        }))
    }
}

// =============================================================================
// Validated -> Rendered -> Written
// =============================================================================

impl Site<Validated> {
    /// Render the configuration text for the validated kind.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateRender` if the text is malformed.
    pub fn render(self, store: &SiteStore) -> Result<Site<Rendered>> {
        let artifact = self.build_artifact(store, self.state.kind);
        if !braces_balanced(&artifact.text) {
            return Err(Error::TemplateRender(
                self.host.to_string(),
                "unbalanced braces in rendered text".to_string(),
            ));
        }

        Ok(self.transition(Rendered { artifact }))
    }
}

impl Site<Rendered> {
    /// Atomically write the artifact, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileWrite` if the file cannot be written.
    pub fn write(self, store: &SiteStore) -> Result<Site<Written>> {
        store.write_artifact(&self.state.artifact)?;
        let path = self.state.artifact.path.clone();
        Ok(self.transition(Written { path }))
    }
}

// =============================================================================
// Written -> Enabled -> Reloaded
// =============================================================================

impl Site<Written> {
    /// Link the site and verify the server config, without prompting.
    ///
    /// The post-link test only runs if the link was created here; an
    /// existing link was already covered by the test in [`Enabler::link`].
    ///
    /// # Errors
    ///
    /// See [`Enabler::link`]; additionally `Error::ExternalCommandFailed`
    /// from the post-link config test, which leaves the link in place.
    pub async fn enable<R: CommandRunner>(
        self,
        enabler: &Enabler<'_, R>,
    ) -> Result<Site<Enabled>> {
        let link = enabler.link(&self.host).await?;
        if link == LinkOutcome::Created {
            enabler.verify().await?;
        }

        let path = self.state.path.clone();
        Ok(self.transition(Enabled { path, link }))
    }
}

impl Site<Enabled> {
    /// Reload the server. On failure the file and link stay as they are.
    pub async fn reload<R: CommandRunner>(self, gateway: &Gateway<R>) -> Result<Site<Reloaded>> {
        gateway.reload().await?;

        let Enabled { path, link } = self.state.clone();
        Ok(self.transition(Reloaded { path, link }))
    }
}
