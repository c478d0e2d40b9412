// ABOUTME: Diagnostics accumulator for non-fatal warnings during a site operation.
// ABOUTME: Collects warnings that shouldn't fail a flow but should be shown to the operator.

/// Collects non-fatal warnings during site operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a site operation.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The proxy upstream is a name the server has to resolve itself.
    pub fn unresolved_upstream(host: &str) -> Self {
        Self {
            kind: WarningKind::UnresolvedUpstream,
            message: format!(
                "upstream hostname {host} must be resolvable; update /etc/hosts or configure DNS for the site to function properly"
            ),
        }
    }

    /// The site was enabled before this run.
    pub fn already_enabled(site: &str) -> Self {
        Self {
            kind: WarningKind::AlreadyEnabled,
            message: format!("site {site} is already enabled in sites-enabled"),
        }
    }
}

/// Categories of warnings that can occur during site operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Upstream host is not an IP literal.
    UnresolvedUpstream,
    /// Enable found a correct link already in place.
    AlreadyEnabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::unresolved_upstream("app.internal"));
        diag.warn(Warning::already_enabled("teste"));

        assert!(diag.has_warnings());
        assert_eq!(diag.warnings().len(), 2);
    }

    #[test]
    fn warning_constructors_set_correct_kind() {
        let upstream = Warning::unresolved_upstream("app.internal");
        assert_eq!(upstream.kind, WarningKind::UnresolvedUpstream);
        assert!(upstream.message.contains("app.internal"));

        let enabled = Warning::already_enabled("teste");
        assert_eq!(enabled.kind, WarningKind::AlreadyEnabled);
    }
}
