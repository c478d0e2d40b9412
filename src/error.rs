// ABOUTME: Application-wide error types for nxsite.
// ABOUTME: Every error belongs to one ErrorKind, and every kind has one exit code.

use nonempty::NonEmpty;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::HostNameError;
use crate::validate::Violation;

/// An external command invocation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Config test before any mutation.
    ConfigTest,
    /// Config test after the enablement link was created.
    PostEnableTest,
    /// Config test after the enablement link was removed.
    PostDisableTest,
    /// Server reload.
    Reload,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ConfigTest => f.write_str("configuration test"),
            Stage::PostEnableTest => f.write_str("configuration test after enabling site"),
            Stage::PostDisableTest => f.write_str("configuration test after disabling site"),
            Stage::Reload => f.write_str("reload"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration directory {} does not exist", .0.display())]
    ConfigDirMissing(PathBuf),

    #[error(
        "configuration file {} already exists; remove it or choose a different site name",
        .0.display()
    )]
    ArtifactAlreadyExists(PathBuf),

    #[error("invalid site parameters: {}", join_violations(.0))]
    ValidationFailed(NonEmpty<Violation>),

    #[error("rendered configuration for {0} is malformed: {1}")]
    TemplateRender(String, String),

    #[error("failed to write configuration file {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration file {} not found", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("site is not enabled: symbolic link {} does not exist", .0.display())]
    LinkNotFound(PathBuf),

    #[error(
        "{} points to {found}, expected {}; resolve it manually",
        .link.display(),
        .expected.display()
    )]
    LinkConflict {
        link: PathBuf,
        expected: PathBuf,
        found: String,
    },

    #[error("failed to create symbolic link {}: {source}", .path.display())]
    LinkCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove symbolic link {}: {source}", .path.display())]
    LinkRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} failed. Details:\n{diagnostic}")]
    ExternalCommandFailed { stage: Stage, diagnostic: String },

    #[error("failed to read input: {0}")]
    Prompt(String),

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<HostNameError> for Error {
    fn from(err: HostNameError) -> Self {
        Error::ValidationFailed(NonEmpty::new(Violation::HostName(err)))
    }
}

fn join_violations(violations: &NonEmpty<Violation>) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure category reported to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigDirMissing,
    Conflict,
    Template,
    FileIo,
    Enable,
    ConfigTest,
    Reload,
    Input,
    Settings,
}

impl ErrorKind {
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorKind::ConfigDirMissing => 1,
            ErrorKind::Conflict => 2,
            ErrorKind::Template => 3,
            ErrorKind::FileIo => 4,
            ErrorKind::Enable => 5,
            ErrorKind::ConfigTest => 6,
            ErrorKind::Reload => 7,
            ErrorKind::Input => 8,
            ErrorKind::Settings => 9,
        }
    }
}

/// Exit code for a site that was written but left inactive because of
/// validation violations.
pub const NOT_ACTIVATED_EXIT_CODE: u8 = 10;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConfigDirMissing(_) => ErrorKind::ConfigDirMissing,
            Error::ArtifactAlreadyExists(_)
            | Error::ValidationFailed(_)
            | Error::ArtifactNotFound(_)
            | Error::LinkNotFound(_)
            | Error::LinkConflict { .. } => ErrorKind::Conflict,
            Error::TemplateRender(..) => ErrorKind::Template,
            Error::FileWrite { .. } | Error::Io(_) => ErrorKind::FileIo,
            Error::LinkCreate { .. } | Error::LinkRemove { .. } => ErrorKind::Enable,
            Error::ExternalCommandFailed { stage, .. } => match stage {
                Stage::Reload => ErrorKind::Reload,
                Stage::ConfigTest | Stage::PostEnableTest | Stage::PostDisableTest => {
                    ErrorKind::ConfigTest
                }
            },
            Error::Prompt(_) => ErrorKind::Input,
            Error::Settings(_) | Error::Yaml(_) => ErrorKind::Settings,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
