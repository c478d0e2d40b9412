// ABOUTME: Gateway to the web server's config-test and reload commands.
// ABOUTME: Commands run through an injectable runner so flows can be tested with a fake.

use async_trait::async_trait;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{Error, Result, Stage};

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct CommandSpec(NonEmpty<String>);

impl TryFrom<Vec<String>> for CommandSpec {
    type Error = String;

    fn try_from(argv: Vec<String>) -> std::result::Result<Self, Self::Error> {
        NonEmpty::from_vec(argv)
            .map(Self)
            .ok_or_else(|| "command cannot be empty".to_string())
    }
}

impl CommandSpec {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self(NonEmpty {
            head: program.to_string(),
            tail: args.iter().map(|a| a.to_string()).collect(),
        })
    }

    pub fn program(&self) -> &str {
        self.0.first()
    }

    pub fn args(&self) -> &[String] {
        self.0.tail()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let argv: Vec<&str> = self.0.iter().map(String::as_str).collect();
        f.write_str(&argv.join(" "))
    }
}

/// Why a command did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// Exit code, `None` if the process was killed or never started.
    pub exit_code: Option<i32>,
    /// Captured standard error, or the spawn error.
    pub diagnostic: String,
}

/// Runs an external command to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &CommandSpec) -> std::result::Result<(), CommandFailure>;
}

/// Runs commands as child processes, capturing standard error.
///
/// No timeout is applied; a hung command blocks the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &CommandSpec) -> std::result::Result<(), CommandFailure> {
        tracing::debug!(%command, "running external command");

        let output = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CommandFailure {
                exit_code: None,
                diagnostic: format!("failed to execute {}: {}", command.program(), e),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let failure = CommandFailure {
            exit_code: output.status.code(),
            diagnostic: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::warn!(%command, exit_code = ?failure.exit_code, "external command failed");
        Err(failure)
    }
}

/// The server commands a gateway invokes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerCommands {
    #[serde(default = "default_test_command")]
    pub test: CommandSpec,
    #[serde(default = "default_reload_command")]
    pub reload: CommandSpec,
}

fn default_test_command() -> CommandSpec {
    CommandSpec::new("nginx", &["-t"])
}

fn default_reload_command() -> CommandSpec {
    CommandSpec::new("systemctl", &["reload", "nginx"])
}

impl Default for ServerCommands {
    fn default() -> Self {
        Self {
            test: default_test_command(),
            reload: default_reload_command(),
        }
    }
}

/// Config-test and reload, each invoked at most once per call.
pub struct Gateway<R> {
    runner: R,
    commands: ServerCommands,
}

impl<R: CommandRunner> Gateway<R> {
    pub fn new(runner: R, commands: ServerCommands) -> Self {
        Self { runner, commands }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the config test, reporting failure under `stage`.
    pub async fn test_config(&self, stage: Stage) -> Result<()> {
        self.invoke(&self.commands.test, stage).await
    }

    pub async fn reload(&self) -> Result<()> {
        self.invoke(&self.commands.reload, Stage::Reload).await?;
        tracing::info!("server reloaded");
        Ok(())
    }

    async fn invoke(&self, command: &CommandSpec, stage: Stage) -> Result<()> {
        self.runner
            .run(command)
            .await
            .map_err(|failure| Error::ExternalCommandFailed {
                stage,
                diagnostic: failure.diagnostic,
            })
    }
}
