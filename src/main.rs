// ABOUTME: Entry point for the nxsite CLI application.
// ABOUTME: Parses arguments, loads settings and dispatches to the lifecycle controller.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, CreateArgs};
use nxsite::config::Settings;
use nxsite::error::{NOT_ACTIVATED_EXIT_CODE, Result};
use nxsite::gateway::{Gateway, ProcessRunner};
use nxsite::input::{SiteParams, TerminalInput};
use nxsite::lifecycle::{Controller, CreateOutcome, EnableOutcome, LinkOutcome};
use nxsite::output::{Output, OutputMode};
use nxsite::store::SiteStore;
use nxsite::types::HostName;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("error")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);
    output.start_timer();

    match run(cli, &output).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            output.error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli, output: &Output) -> Result<u8> {
    let mut settings = Settings::discover(cli.settings.as_deref())?;
    if let Some(dir) = cli.config_dir {
        settings.config_dir = dir;
    }

    let store = SiteStore::open(&settings.config_dir)?;
    let gateway = Gateway::new(ProcessRunner, settings.commands.clone());
    let mut controller = Controller::new(store, gateway);

    let result = match cli.command {
        Commands::Create(args) => create(&mut controller, &settings, &args, output).await,
        Commands::Enable { site, force } => {
            let host = HostName::from_site_name(&site)?;
            let mut input = TerminalInput::new(SiteParams::default());
            let outcome = controller.enable(&host, &mut input, force).await;
            outcome.map(|outcome| report_enable(&host, outcome, output))
        }
        Commands::Disable { site } => {
            let host = HostName::from_site_name(&site)?;
            let outcome = controller.disable(&host).await;
            outcome.map(|_| {
                output.progress(&format!("Site {host} disabled successfully."));
                output.success("Nginx reloaded successfully.");
                0
            })
        }
    };

    for warning in controller.diagnostics().warnings() {
        output.warning(&warning.message);
    }

    result
}

async fn create(
    controller: &mut Controller<ProcessRunner>,
    settings: &Settings,
    args: &CreateArgs,
    output: &Output,
) -> Result<u8> {
    let mut input = TerminalInput::new(args.params())
        .non_interactive(args.non_interactive)
        .certificate_defaults(
            settings.certificates.fullchain.clone(),
            settings.certificates.privkey.clone(),
        );

    let code = match controller.create(&mut input).await? {
        CreateOutcome::Activated { host, path, link } => {
            output.progress(&format!("Configuration file created: {}", path.display()));
            report_link(&host, link, output);
            output.success("Nginx reloaded successfully.");
            0
        }
        CreateOutcome::NotActivated {
            host,
            path,
            violations,
        } => {
            output.success(&format!("Configuration file created: {}", path.display()));
            output.warning("cannot reload nginx due to the following issues:");
            for violation in violations.iter() {
                output.violation(&violation.to_string());
            }
            output.progress(&format!(
                "Please fix the parameters and run `nxsite enable {host}` to enable the site."
            ));
            NOT_ACTIVATED_EXIT_CODE
        }
        CreateOutcome::EnableDeclined { host, path } => {
            output.success(&format!("Configuration file created: {}", path.display()));
            output.progress(&format!(
                "Nginx reload skipped. Use `nxsite enable {host}` to enable the site."
            ));
            0
        }
        CreateOutcome::Cancelled { .. } => {
            output.success("Operation canceled. No changes made.");
            0
        }
    };

    Ok(code)
}

fn report_enable(host: &HostName, outcome: EnableOutcome, output: &Output) -> u8 {
    match outcome {
        EnableOutcome::Reloaded(link) => {
            report_link(host, link, output);
            output.success("Nginx reloaded successfully.");
        }
        EnableOutcome::ReloadSkipped => output.success("Nginx reload skipped."),
    }
    0
}

fn report_link(host: &HostName, link: LinkOutcome, output: &Output) {
    match link {
        LinkOutcome::Created => output.progress(&format!("Site {host} enabled successfully.")),
        LinkOutcome::AlreadyEnabled => {
            output.progress(&format!("Site {host} was already enabled."))
        }
    }
}
