// ABOUTME: Integration tests for the nxsite CLI commands.
// ABOUTME: Runs the binary against temp config dirs with `true` as the server commands.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use support::ConfigDir;

fn nxsite_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nxsite"));
    cmd.env_remove("NXSITE_SETTINGS");
    cmd
}

/// Command bound to `config`, with settings that make every server command succeed.
fn nxsite_in(config: &ConfigDir) -> Command {
    let mut cmd = nxsite_cmd();
    cmd.arg("--settings").arg(config.write_settings());
    cmd
}

#[test]
fn help_shows_commands() {
    nxsite_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("enable"))
        .stdout(predicate::str::contains("disable"));
}

#[test]
fn batch_create_activates_site() {
    let config = ConfigDir::new();

    nxsite_in(&config)
        .args(["create", "--site-name", "teste.example.com", "--site-type", "proxy"])
        .args(["--upstream-host", "192.168.1.100", "--upstream-port", "8080"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"))
        .stdout(predicate::str::contains("Nginx reloaded successfully"));

    let text = fs::read_to_string(config.available("teste")).unwrap();
    assert!(text.contains("upstream teste {"));
    assert!(text.contains("proxy_pass http://teste;"));
    assert!(fs::symlink_metadata(config.enabled("teste")).is_ok());
}

#[test]
fn batch_create_with_missing_certificate_exits_not_activated() {
    let config = ConfigDir::new();
    let missing = config.path().join("certs/absent.pem");

    nxsite_in(&config)
        .args(["create", "--site-name", "teste.example.com", "--site-type", "local"])
        .arg("--privkey-path")
        .arg(&missing)
        .assert()
        .code(10)
        .stdout(predicate::str::contains("Configuration file created"))
        .stderr(predicate::str::contains("absent.pem"))
        .stderr(predicate::str::contains("nxsite enable teste").not())
        .stdout(predicate::str::contains("nxsite enable teste"));

    assert!(config.available("teste").exists());
    assert!(fs::symlink_metadata(config.enabled("teste")).is_err());
}

#[test]
fn batch_create_refuses_existing_file() {
    let config = ConfigDir::new();
    fs::write(config.available("teste"), "hand written").unwrap();

    nxsite_in(&config)
        .args(["create", "--site-name", "teste.example.com", "--site-type", "local"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(config.available("teste")).unwrap(),
        "hand written"
    );
}

#[test]
fn enable_without_artifact_fails() {
    let config = ConfigDir::new();

    nxsite_in(&config)
        .args(["enable", "teste"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));

    assert!(fs::symlink_metadata(config.enabled("teste")).is_err());
}

#[test]
fn disable_when_not_enabled_fails() {
    let config = ConfigDir::new();

    nxsite_in(&config)
        .args(["disable", "teste"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not enabled"));
}

#[test]
fn missing_config_dir_exits_one() {
    let config = ConfigDir::new();

    nxsite_in(&config)
        .arg("--config-dir")
        .arg(config.path().join("nowhere"))
        .args(["disable", "teste"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn failing_reload_exits_with_reload_code() {
    let config = ConfigDir::new();
    let settings = config.path().join("failing.yml");
    fs::write(
        &settings,
        "commands:\n  test: [\"true\"]\n  reload: [\"sh\", \"-c\", \"echo reload refused >&2; exit 1\"]\n",
    )
    .unwrap();
    fs::write(config.available("teste"), "server {}\n").unwrap();

    nxsite_cmd()
        .arg("--settings")
        .arg(&settings)
        .arg("--config-dir")
        .arg(config.path())
        .args(["enable", "teste"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("reload refused"));

    assert!(fs::symlink_metadata(config.enabled("teste")).is_ok());
}

#[test]
fn enable_disable_round_trip() {
    let config = ConfigDir::new();

    nxsite_in(&config)
        .args(["create", "--site-name", "docs.example.com", "--site-type", "local"])
        .assert()
        .success();

    nxsite_in(&config)
        .args(["disable", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site docs disabled"));
    assert!(fs::symlink_metadata(config.enabled("docs")).is_err());

    nxsite_in(&config)
        .args(["enable", "docs.example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site docs enabled"));
    assert!(fs::symlink_metadata(config.enabled("docs")).is_ok());
}

#[test]
fn already_enabled_without_terminal_skips_reload() {
    let config = ConfigDir::new();

    nxsite_in(&config)
        .args(["create", "--site-name", "docs.example.com", "--site-type", "local"])
        .assert()
        .success();

    nxsite_in(&config)
        .args(["enable", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reload skipped"))
        .stderr(predicate::str::contains("already enabled"));

    nxsite_in(&config)
        .args(["enable", "--force", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nginx reloaded successfully"));
}

#[test]
fn json_mode_emits_events() {
    let config = ConfigDir::new();

    nxsite_in(&config)
        .arg("--json")
        .args(["disable", "teste"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(r#""event":"error""#));
}

#[test]
fn invalid_settings_exit_nine() {
    let config = ConfigDir::new();
    let settings = config.path().join("bad.yml");
    fs::write(&settings, "unknown_key: 1\n").unwrap();

    nxsite_cmd()
        .arg("--settings")
        .arg(&settings)
        .args(["disable", "teste"])
        .assert()
        .code(9);
}
