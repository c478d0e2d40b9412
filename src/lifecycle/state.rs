// ABOUTME: Site lifecycle state markers for the type state pattern.
// ABOUTME: Later states carry the data earlier transitions produced.

use nonempty::NonEmpty;
use std::path::{Path, PathBuf};

use crate::store::SiteConfigArtifact;
use crate::types::SiteKind;
use crate::validate::Violation;

/// Record assembled from input, not yet checked.
/// Available actions: `validate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Requested;

/// Record passed every rule.
/// Available actions: `render()`
#[derive(Debug, Clone, Copy)]
pub struct Validated {
    pub(crate) kind: SiteKind,
}

/// Record broke at least one rule.
/// Available actions: `write_draft()`
#[derive(Debug, Clone)]
pub struct Invalid {
    pub(crate) violations: NonEmpty<Violation>,
}

/// Configuration text produced, nothing on disk yet.
/// Available actions: `write()`
#[derive(Debug, Clone)]
pub struct Rendered {
    pub(crate) artifact: SiteConfigArtifact,
}

/// Valid artifact on disk in `sites-available`.
/// Available actions: `enable()`
#[derive(Debug, Clone)]
pub struct Written {
    pub(crate) path: PathBuf,
}

/// Invalid artifact on disk; never enabled by this run.
/// Terminal state.
#[derive(Debug, Clone)]
pub struct Drafted {
    pub(crate) path: PathBuf,
    pub(crate) violations: NonEmpty<Violation>,
}

/// Enablement link in place and the config test passed.
/// Available actions: `reload()`
#[derive(Debug, Clone)]
pub struct Enabled {
    pub(crate) path: PathBuf,
    pub(crate) link: LinkOutcome,
}

/// Server reloaded with the site active.
/// Terminal state.
#[derive(Debug, Clone)]
pub struct Reloaded {
    pub(crate) path: PathBuf,
    pub(crate) link: LinkOutcome,
}

/// What the enable step did to the enablement link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The link was created by this run.
    Created,
    /// A correctly targeted link was already there; it was left alone.
    AlreadyEnabled,
}

impl Invalid {
    pub fn violations(&self) -> &NonEmpty<Violation> {
        &self.violations
    }
}

impl Written {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drafted {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn violations(&self) -> &NonEmpty<Violation> {
        &self.violations
    }
}

impl Enabled {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn link(&self) -> LinkOutcome {
        self.link
    }
}

impl Reloaded {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn link(&self) -> LinkOutcome {
        self.link
    }
}
