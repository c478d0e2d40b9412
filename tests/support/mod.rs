// ABOUTME: Test support utilities.
// ABOUTME: Provides a recording command runner, scripted input and config directory fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use nxsite::error::Result;
use nxsite::gateway::{CommandFailure, CommandRunner, CommandSpec, Gateway, ServerCommands};
use nxsite::input::InputSource;
use nxsite::lifecycle::Controller;
use nxsite::site::Field;
use nxsite::store::{AVAILABLE_DIR, ENABLED_DIR, SiteStore};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

pub const TEST_COMMAND: &str = "nginx -t";
pub const RELOAD_COMMAND: &str = "systemctl reload nginx";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("nxsite=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Records every command it is asked to run; fails the ones it is told to.
#[derive(Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<String>>,
    // command line -> 1-based invocations that should fail
    failures: Mutex<HashMap<String, Vec<usize>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `occurrence`-th run (1-based) of `command`.
    pub fn failing(self, command: &str, occurrence: usize) -> Self {
        self.failures
            .lock()
            .entry(command.to_string())
            .or_default()
            .push(occurrence);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == command).count()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, command: &CommandSpec) -> std::result::Result<(), CommandFailure> {
        let line = command.to_string();
        let occurrence = {
            let mut calls = self.calls.lock();
            calls.push(line.clone());
            calls.iter().filter(|c| **c == line).count()
        };

        let fails = self
            .failures
            .lock()
            .get(&line)
            .is_some_and(|runs| runs.contains(&occurrence));
        if fails {
            return Err(CommandFailure {
                exit_code: Some(1),
                diagnostic: format!("{line}: emerg: simulated failure"),
            });
        }
        Ok(())
    }
}

/// Answers prompts from a fixed table.
pub struct ScriptedInput {
    values: HashMap<Field, String>,
    answers: VecDeque<bool>,
    batch: bool,
    pub questions: Vec<String>,
}

impl ScriptedInput {
    /// Input that never asks for confirmation.
    pub fn batch() -> Self {
        Self {
            values: HashMap::new(),
            answers: VecDeque::new(),
            batch: true,
            questions: Vec::new(),
        }
    }

    /// Input that answers confirmations in order, then declines.
    pub fn interactive(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            batch: false,
            ..Self::batch()
        }
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }
}

impl InputSource for ScriptedInput {
    fn is_batch(&self) -> bool {
        self.batch
    }

    fn value(&mut self, field: Field) -> Result<String> {
        Ok(self.values.get(&field).cloned().unwrap_or_default())
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}

/// A temporary server configuration directory with certificate files.
pub struct ConfigDir {
    pub dir: TempDir,
    pub fullchain: PathBuf,
    pub privkey: PathBuf,
}

impl ConfigDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(AVAILABLE_DIR)).unwrap();
        fs::create_dir(dir.path().join(ENABLED_DIR)).unwrap();

        let certs = dir.path().join("certs");
        fs::create_dir(&certs).unwrap();
        let fullchain = certs.join("fullchain.pem");
        let privkey = certs.join("privkey.pem");
        fs::write(&fullchain, "chain").unwrap();
        fs::write(&privkey, "key").unwrap();

        Self {
            dir,
            fullchain,
            privkey,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn available(&self, host: &str) -> PathBuf {
        self.path().join(AVAILABLE_DIR).join(format!("{host}.conf"))
    }

    pub fn enabled(&self, host: &str) -> PathBuf {
        self.path().join(ENABLED_DIR).join(format!("{host}.conf"))
    }

    pub fn controller(&self, runner: FakeRunner) -> Controller<FakeRunner> {
        let store = SiteStore::open(self.path()).unwrap();
        Controller::new(store, Gateway::new(runner, ServerCommands::default()))
    }

    /// Batch input for a valid proxy site.
    pub fn proxy_input(&self, site_name: &str) -> ScriptedInput {
        ScriptedInput::batch()
            .with(Field::SiteName, site_name)
            .with(Field::SiteKind, "proxy")
            .with(Field::UpstreamHost, "10.0.0.5")
            .with(Field::UpstreamPort, "8080")
            .with(Field::UpstreamProtocol, "http")
            .with(Field::FullchainPath, self.fullchain.display().to_string())
            .with(Field::PrivkeyPath, self.privkey.display().to_string())
    }

    /// Batch input for a valid local site.
    pub fn local_input(&self, site_name: &str) -> ScriptedInput {
        ScriptedInput::batch()
            .with(Field::SiteName, site_name)
            .with(Field::SiteKind, "local")
            .with(Field::FullchainPath, self.fullchain.display().to_string())
            .with(Field::PrivkeyPath, self.privkey.display().to_string())
    }

    /// Settings file running `true` for both server commands.
    pub fn write_settings(&self) -> PathBuf {
        let path = self.path().join("settings.yml");
        let yaml = format!(
            "config_dir: {}\ncommands:\n  test: [\"true\"]\n  reload: [\"true\"]\ncertificates:\n  fullchain: {}\n  privkey: {}\n",
            self.path().display(),
            self.fullchain.display(),
            self.privkey.display()
        );
        fs::write(&path, yaml).unwrap();
        path
    }
}
