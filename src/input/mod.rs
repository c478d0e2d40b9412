// ABOUTME: Sources of site parameters and operator confirmations.
// ABOUTME: Flags first, then terminal prompts; batch mode never prompts.

use std::io::IsTerminal;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::site::{DEFAULT_FULLCHAIN_PATH, DEFAULT_PRIVKEY_PATH, Field};
use crate::types::SiteKind;

/// Where the lifecycle controller gets parameters and answers from.
pub trait InputSource {
    /// Whether every required parameter was supplied upfront. Batch input
    /// is never asked to confirm anything.
    fn is_batch(&self) -> bool;

    /// The value for `field`, prompting if needed.
    fn value(&mut self, field: Field) -> Result<String>;

    /// Ask a yes/no question. Declining is the safe answer.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Site parameters given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SiteParams {
    pub site_name: Option<String>,
    pub site_kind: Option<String>,
    pub upstream_host: Option<String>,
    pub upstream_port: Option<String>,
    pub upstream_protocol: Option<String>,
    pub fullchain_path: Option<String>,
    pub privkey_path: Option<String>,
}

impl SiteParams {
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::SiteName => &self.site_name,
            Field::SiteHostName => &None,
            Field::SiteKind => &self.site_kind,
            Field::UpstreamHost => &self.upstream_host,
            Field::UpstreamPort => &self.upstream_port,
            Field::UpstreamProtocol => &self.upstream_protocol,
            Field::FullchainPath => &self.fullchain_path,
            Field::PrivkeyPath => &self.privkey_path,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Site name and kind given, plus upstream host and port for a proxy.
    /// Certificate paths and the protocol have defaults.
    pub fn is_complete(&self) -> bool {
        let named = self.get(Field::SiteName).is_some();
        match self.get(Field::SiteKind).map(str::parse::<SiteKind>) {
            Some(Ok(SiteKind::Proxy)) => {
                named
                    && self.get(Field::UpstreamHost).is_some()
                    && self.get(Field::UpstreamPort).is_some()
            }
            Some(_) => named,
            None => false,
        }
    }
}

/// Reads flags, falling back to terminal prompts for anything missing.
///
/// Without a terminal on stdin, prompts resolve to their defaults and
/// confirmations decline.
pub struct TerminalInput {
    params: SiteParams,
    forced_batch: bool,
    fullchain_default: PathBuf,
    privkey_default: PathBuf,
}

impl TerminalInput {
    pub fn new(params: SiteParams) -> Self {
        Self {
            params,
            forced_batch: false,
            fullchain_default: PathBuf::from(DEFAULT_FULLCHAIN_PATH),
            privkey_default: PathBuf::from(DEFAULT_PRIVKEY_PATH),
        }
    }

    /// Never prompt, even with parameters missing.
    pub fn non_interactive(mut self, yes: bool) -> Self {
        self.forced_batch = yes;
        self
    }

    pub fn certificate_defaults(mut self, fullchain: PathBuf, privkey: PathBuf) -> Self {
        self.fullchain_default = fullchain;
        self.privkey_default = privkey;
        self
    }

    fn default_for(&self, field: Field) -> Option<String> {
        match field {
            Field::FullchainPath => Some(self.fullchain_default.display().to_string()),
            Field::PrivkeyPath => Some(self.privkey_default.display().to_string()),
            Field::UpstreamProtocol if self.is_batch() => Some("http".to_string()),
            _ => None,
        }
    }
}

impl InputSource for TerminalInput {
    fn is_batch(&self) -> bool {
        self.forced_batch || self.params.is_complete()
    }

    fn value(&mut self, field: Field) -> Result<String> {
        if let Some(value) = self.params.get(field) {
            return Ok(value.trim().to_string());
        }

        let default = self.default_for(field);
        if self.is_batch() || !std::io::stdin().is_terminal() {
            tracing::debug!(%field, ?default, "no value supplied, using default");
            return Ok(default.unwrap_or_default());
        }

        let mut prompt = dialoguer::Input::<String>::new()
            .with_prompt(field.prompt())
            .allow_empty(true);
        if let Some(default) = default {
            prompt = prompt.default(default);
        }

        prompt
            .interact_text()
            .map(|answer| answer.trim().to_string())
            .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        if self.is_batch() || !std::io::stdin().is_terminal() {
            tracing::debug!(question, "no terminal to confirm on, declining");
            return Ok(false);
        }

        dialoguer::Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(|e| Error::Prompt(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(name: &str, kind: &str) -> SiteParams {
        SiteParams {
            site_name: Some(name.to_string()),
            site_kind: Some(kind.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn local_site_with_name_and_kind_is_batch() {
        assert!(params("web.example.com", "local").is_complete());
    }

    #[test]
    fn proxy_needs_upstream_to_be_batch() {
        let mut p = params("api.example.com", "proxy");
        assert!(!p.is_complete());
        p.upstream_host = Some("10.0.0.5".to_string());
        p.upstream_port = Some("8080".to_string());
        assert!(p.is_complete());
    }

    #[test]
    fn unknown_kind_still_counts_as_given() {
        assert!(params("web.example.com", "static").is_complete());
        assert!(!SiteParams::default().is_complete());
    }

    #[test]
    fn empty_flags_count_as_missing() {
        let p = SiteParams {
            site_name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(p.get(Field::SiteName), None);
    }

    #[test]
    fn batch_input_fills_defaults() {
        let mut input =
            TerminalInput::new(params("api.example.com", "proxy")).non_interactive(true);
        assert!(input.is_batch());
        assert_eq!(input.value(Field::UpstreamProtocol).unwrap(), "http");
        assert_eq!(input.value(Field::UpstreamHost).unwrap(), "");
        assert_eq!(
            input.value(Field::FullchainPath).unwrap(),
            DEFAULT_FULLCHAIN_PATH
        );
        assert!(!input.confirm("overwrite?").unwrap());
    }

    #[test]
    fn flags_win_over_defaults() {
        let mut p = params("web.example.com", "local");
        p.privkey_path = Some("/srv/tls/key.pem".to_string());
        let mut input = TerminalInput::new(p)
            .certificate_defaults("/etc/tls/chain.pem".into(), "/etc/tls/key.pem".into());
        assert_eq!(input.value(Field::PrivkeyPath).unwrap(), "/srv/tls/key.pem");
        assert_eq!(
            input.value(Field::FullchainPath).unwrap(),
            "/etc/tls/chain.pem"
        );
    }
}
