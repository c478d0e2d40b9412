// ABOUTME: Lifecycle controller driving the create, enable and disable flows.
// ABOUTME: Owns the store, the gateway and the diagnostics of one invocation.

use nonempty::NonEmpty;
use std::path::PathBuf;

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result, Stage};
use crate::gateway::{CommandRunner, Gateway};
use crate::input::InputSource;
use crate::site::{Field, SiteRecord, Upstream};
use crate::store::{LinkState, SiteStore};
use crate::types::{HostName, SiteKind};
use crate::validate::{Violation, check_site_name, is_ip_address};

use super::enable::Enabler;
use super::site::Site;
use super::state::LinkOutcome;

/// How a create run ended without an error.
#[derive(Debug)]
pub enum CreateOutcome {
    /// Written, enabled and the server reloaded.
    Activated {
        host: HostName,
        path: PathBuf,
        link: LinkOutcome,
    },
    /// Written with violations; enable, test and reload were skipped.
    NotActivated {
        host: HostName,
        path: PathBuf,
        violations: NonEmpty<Violation>,
    },
    /// Written, but the operator chose not to enable it now.
    EnableDeclined { host: HostName, path: PathBuf },
    /// The operator declined to overwrite an existing file. Nothing changed.
    Cancelled { path: PathBuf },
}

/// How an enable run ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableOutcome {
    /// Server reloaded with the site enabled.
    Reloaded(LinkOutcome),
    /// Site was already enabled and the reload was declined.
    ReloadSkipped,
}

/// Runs site flows against one configuration directory.
///
/// Every flow is sequential and invokes each external command at most
/// once per step. Nothing is rolled back on failure: a half-finished
/// state stays on disk for the operator to inspect.
pub struct Controller<R> {
    store: SiteStore,
    gateway: Gateway<R>,
    diagnostics: Diagnostics,
}

impl<R: CommandRunner> Controller<R> {
    pub fn new(store: SiteStore, gateway: Gateway<R>) -> Self {
        Self {
            store,
            gateway,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn gateway(&self) -> &Gateway<R> {
        &self.gateway
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Create (or reconfigure) a site from `input`.
    ///
    /// Violations never stop the artifact from being written; they stop
    /// the site from being activated.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationFailed` if no host name can be derived.
    /// - `Error::ArtifactAlreadyExists` for batch input over an existing file.
    /// - Anything from writing, enabling or reloading.
    pub async fn create<I>(&mut self, input: &mut I) -> Result<CreateOutcome>
    where
        I: InputSource + ?Sized,
    {
        let site_name = input.value(Field::SiteName)?;
        let host = HostName::from_site_name(&site_name).map_err(|e| {
            let mut violations = NonEmpty::new(Violation::HostName(e));
            if let Some(v) = check_site_name(site_name.trim()) {
                violations.push(v);
            }
            Error::ValidationFailed(violations)
        })?;

        let available = self.store.available_path(&host);
        if self.store.artifact_exists(&host) {
            if input.is_batch() {
                return Err(Error::ArtifactAlreadyExists(available));
            }

            let question = format!(
                "Configuration file {} already exists. Do you want to reconfigure it?",
                available.display()
            );
            if !input.confirm(&question)? {
                tracing::info!(%host, "reconfiguration declined");
                return Ok(CreateOutcome::Cancelled { path: available });
            }
        }

        let record = self.collect_record(site_name, input)?;
        let site = Site::new(record)?;
        tracing::debug!(
            host = %site.host(),
            kind = site.record().kind_text(),
            "validating site"
        );

        let site = match site.validate() {
            Ok(site) => site,
            Err(invalid) => {
                let drafted = invalid.write_draft(&self.store)?;
                let state = drafted.state();
                return Ok(CreateOutcome::NotActivated {
                    host: drafted.host().clone(),
                    path: state.path().to_path_buf(),
                    violations: state.violations().clone(),
                });
            }
        };

        let written = site.render(&self.store)?.write(&self.store)?;
        let path = written.state().path().to_path_buf();

        let question = "Do you want to enable the site and reload nginx?";
        if !input.is_batch() && !input.confirm(question)? {
            return Ok(CreateOutcome::EnableDeclined { host, path });
        }

        let enabler = Enabler::new(&self.store, &self.gateway);
        let reloaded = written.enable(&enabler).await?.reload(&self.gateway).await?;

        Ok(CreateOutcome::Activated {
            host,
            path,
            link: reloaded.state().link(),
        })
    }

    /// Enable an existing site and reload the server.
    ///
    /// An already enabled site is left as is; the reload then needs
    /// `force` or the operator's confirmation.
    ///
    /// # Errors
    ///
    /// See [`Enabler::link`]; plus the post-link config test and reload.
    pub async fn enable<I>(
        &mut self,
        host: &HostName,
        input: &mut I,
        force: bool,
    ) -> Result<EnableOutcome>
    where
        I: InputSource + ?Sized,
    {
        let enabler = Enabler::new(&self.store, &self.gateway);
        let link = enabler.link(host).await?;

        if link == LinkOutcome::AlreadyEnabled {
            self.diagnostics.warn(Warning::already_enabled(host.as_str()));
            let question = format!("Site {host} is already enabled. Do you want to reload nginx?");
            if !force && !input.confirm(&question)? {
                tracing::info!(%host, "reload skipped");
                return Ok(EnableOutcome::ReloadSkipped);
            }
        }

        if link == LinkOutcome::Created {
            enabler.verify().await?;
        }
        self.gateway.reload().await?;
        Ok(EnableOutcome::Reloaded(link))
    }

    /// Remove a site's enablement link, then test and reload.
    ///
    /// A dangling link still counts as enabled and is removed. As with
    /// enable, only a link resolving to this site's artifact is touched.
    ///
    /// # Errors
    ///
    /// - `Error::LinkNotFound` if there is no link (nothing changed).
    /// - `Error::LinkConflict` if the enabled path holds a link to another
    ///   file or a non-link file (nothing changed).
    /// - `Error::ExternalCommandFailed` from the test or reload; the link
    ///   stays removed.
    pub async fn disable(&mut self, host: &HostName) -> Result<PathBuf> {
        let link = self.store.enabled_path(host);

        let found = match self.store.link_state(host)? {
            LinkState::Absent => return Err(Error::LinkNotFound(link)),
            LinkState::Enabled => None,
            LinkState::Conflicting(target) => Some(target.display().to_string()),
            LinkState::NotALink => Some("a file that is not a symbolic link".to_string()),
        };
        if let Some(found) = found {
            return Err(Error::LinkConflict {
                link,
                expected: self.store.available_path(host),
                found,
            });
        }

        self.store.remove_link(host)?;
        self.gateway.test_config(Stage::PostDisableTest).await?;
        self.gateway.reload().await?;
        Ok(link)
    }

    fn collect_record<I>(&mut self, site_name: String, input: &mut I) -> Result<SiteRecord>
    where
        I: InputSource + ?Sized,
    {
        let kind = input.value(Field::SiteKind)?;

        let upstream = match kind.parse::<SiteKind>() {
            Ok(SiteKind::Proxy) => {
                let host = input.value(Field::UpstreamHost)?;
                if !host.is_empty() && !is_ip_address(&host) {
                    self.diagnostics.warn(Warning::unresolved_upstream(&host));
                }
                let port = input.value(Field::UpstreamPort)?;
                let protocol = input.value(Field::UpstreamProtocol)?;
                Some(Upstream::new(host, port, protocol))
            }
            _ => None,
        };

        let fullchain = input.value(Field::FullchainPath)?;
        let privkey = input.value(Field::PrivkeyPath)?;

        Ok(SiteRecord::assemble(site_name, kind, upstream, fullchain, privkey))
    }
}
