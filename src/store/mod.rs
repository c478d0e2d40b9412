// ABOUTME: Filesystem layout of per-site artifacts and enablement links.
// ABOUTME: Atomic artifact writes and symlink create/remove/inspect.

use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::HostName;

pub const AVAILABLE_DIR: &str = "sites-available";
pub const ENABLED_DIR: &str = "sites-enabled";

/// Rendered configuration text and the path it belongs at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfigArtifact {
    pub path: PathBuf,
    pub text: String,
}

/// What currently sits at a site's enabled path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing there.
    Absent,
    /// A symlink resolving to the site's available artifact.
    Enabled,
    /// A symlink resolving somewhere else.
    Conflicting(PathBuf),
    /// Something other than a symlink.
    NotALink,
}

/// Per-site files under the server's configuration directory.
///
/// There is no locking. Two invocations racing on one site can interleave
/// between a check and the following write, link or remove; each single
/// step relies on the atomicity of rename, symlink and unlink.
#[derive(Debug, Clone)]
pub struct SiteStore {
    root: PathBuf,
}

impl SiteStore {
    /// Open the configuration directory, which must already exist.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::ConfigDirMissing(root.to_path_buf()));
        }

        Ok(Self {
            root: std::path::absolute(root)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn available_path(&self, host: &HostName) -> PathBuf {
        self.root.join(AVAILABLE_DIR).join(host.file_name())
    }

    pub fn enabled_path(&self, host: &HostName) -> PathBuf {
        self.root.join(ENABLED_DIR).join(host.file_name())
    }

    /// Whether the available artifact exists (follows symlinks).
    pub fn artifact_exists(&self, host: &HostName) -> bool {
        self.available_path(host).exists()
    }

    /// Write an artifact so that readers see either the old or the new
    /// content in full, never a truncated file.
    pub fn write_artifact(&self, artifact: &SiteConfigArtifact) -> Result<()> {
        let path = &artifact.path;
        let write_err = |source: io::Error| Error::FileWrite {
            path: path.clone(),
            source,
        };

        let dir = path.parent().unwrap_or(&self.root);
        let mut tmp = tempfile::Builder::new()
            .prefix(".nxsite-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(write_err)?;

        tmp.write_all(artifact.text.as_bytes()).map_err(write_err)?;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        tracing::info!(path = %path.display(), "wrote site configuration");
        Ok(())
    }

    /// Inspect the enablement link without following it.
    pub fn link_state(&self, host: &HostName) -> Result<LinkState> {
        let link = self.enabled_path(host);

        let meta = match fs::symlink_metadata(&link) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LinkState::Absent),
            Err(e) => return Err(e.into()),
        };

        if !meta.file_type().is_symlink() {
            return Ok(LinkState::NotALink);
        }

        let target = resolve_link_target(&link, &fs::read_link(&link)?);
        if same_path(&target, &self.available_path(host)) {
            Ok(LinkState::Enabled)
        } else {
            Ok(LinkState::Conflicting(target))
        }
    }

    /// Point the enabled path at the available artifact.
    pub fn create_link(&self, host: &HostName) -> Result<()> {
        let link = self.enabled_path(host);
        std::os::unix::fs::symlink(self.available_path(host), &link).map_err(|source| {
            Error::LinkCreate {
                path: link.clone(),
                source,
            }
        })?;

        tracing::info!(link = %link.display(), "created enablement link");
        Ok(())
    }

    /// Remove the enablement link. The link target is left alone.
    pub fn remove_link(&self, host: &HostName) -> Result<()> {
        let link = self.enabled_path(host);
        fs::remove_file(&link).map_err(|source| Error::LinkRemove {
            path: link.clone(),
            source,
        })?;

        tracing::info!(link = %link.display(), "removed enablement link");
        Ok(())
    }
}

/// Absolute, lexically normalized target of a symlink.
fn resolve_link_target(link: &Path, raw: &Path) -> PathBuf {
    let joined = match link.parent() {
        Some(parent) if raw.is_relative() => parent.join(raw),
        _ => raw.to_path_buf(),
    };
    normalize(&joined)
}

/// Resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Compare two paths, through the filesystem when both exist.
fn same_path(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => normalize(a) == normalize(b),
    }
}
