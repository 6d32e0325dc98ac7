//! gatepass - Terminal check-in kiosk for workplace access control
//!
//! A guard logs in, scans or types a worker's badge code, and a
//! spreadsheet-backed access service answers with the worker's name and
//! permission status, which is displayed and spoken aloud.

pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod headless;
pub mod input;
pub mod logging;
pub mod service;
pub mod session;
pub mod signal;
pub mod speech;
pub mod tui;

use std::sync::Arc;

use anyhow::{Context, Result};
use yansi::Paint;

use cli::{CheckInArgs, Cli, Commands, LoginArgs, OutputFormat};
use config::Config;
use error::{ExitCode, StructuredError};
use flow::FlowController;
use headless::{HeadlessError, Runner};
use logging::LogTarget;
use service::{AccessService, HttpAccessService};
use session::{FileSessionStore, SessionStore};

/// Run the application for parsed CLI arguments.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }

    let kiosk = matches!(cli.command, None | Some(Commands::Kiosk(_)));
    let log_target = match (&cli.log_file, kiosk) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, true) => LogTarget::Discard,
        (None, false) => LogTarget::Stderr,
    };
    logging::init_logging(cli.verbose, cli.quiet, log_target)?;

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);

    let store = open_store(&config)?;
    if let Some(Commands::Whoami) = cli.command {
        return Ok(whoami(store.as_ref(), cli.json_errors));
    }

    config.validate()?;
    let service: Arc<dyn AccessService> = Arc::new(
        HttpAccessService::new(config.endpoint.clone(), config.request_timeout())
            .context("Failed to initialize access service client")?,
    );
    let shutdown = signal::install_handler()?;

    match &cli.command {
        None | Some(Commands::Kiosk(_)) => {
            let mut flow = FlowController::new(
                Arc::clone(&store),
                service,
                speech::from_config(&config.speech_command, speech::stdout_bell()),
                input::from_config(config.input_mode, config.scanner_device.clone()),
                config.markers(),
            );
            let theme = tui::Theme::from_arg(config.theme);
            match tui::run_kiosk(&mut flow, theme, Some(shutdown.get_flag())) {
                Ok(()) => Ok(ExitCode::Success),
                Err(tui::TuiError::Interrupted) => Ok(ExitCode::Interrupted),
                Err(e) => Err(e.into()),
            }
        }
        Some(Commands::Login(args)) => {
            let runner = Runner::new(shutdown, !cli.quiet);
            login(&runner, store.as_ref(), service, &config, args, cli.json_errors)
        }
        Some(Commands::CheckIn(args)) => {
            let runner = Runner::new(shutdown, !cli.quiet && args.output == OutputFormat::Text);
            check_in(&runner, store.as_ref(), service, &config, args, cli.json_errors)
        }
        Some(Commands::Whoami) => Ok(whoami(store.as_ref(), cli.json_errors)),
    }
}

fn open_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    let store = match &config.session_file {
        Some(path) => FileSessionStore::new(path),
        None => FileSessionStore::default_location()?,
    };
    log::debug!("Session file: {}", store.path().display());
    Ok(Arc::new(store))
}

fn whoami(store: &dyn SessionStore, json_errors: bool) -> ExitCode {
    match store.get() {
        Some(session) => {
            println!(
                "{} (logged in {})",
                session.username.bold(),
                session.logged_in_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            ExitCode::Success
        }
        None => {
            let code = ExitCode::NoSession;
            match json_errors
                .then(|| serde_json::to_string_pretty(&StructuredError::new(&"not logged in", code)))
            {
                Some(Ok(json)) => eprintln!("{}", json),
                _ => eprintln!("[{}] {}", code.code_prefix(), "Not logged in".yellow()),
            }
            code
        }
    }
}

fn login(
    runner: &Runner,
    store: &dyn SessionStore,
    service: Arc<dyn AccessService>,
    config: &Config,
    args: &LoginArgs,
    json_errors: bool,
) -> Result<ExitCode> {
    match runner.login(store, service, &config.markers(), &args.username, &args.password) {
        Ok(session) => {
            println!("{} {}", "Logged in as".green(), session.username.bold());
            Ok(ExitCode::Success)
        }
        Err(e) => report_headless_error(e, json_errors),
    }
}

fn check_in(
    runner: &Runner,
    store: &dyn SessionStore,
    service: Arc<dyn AccessService>,
    config: &Config,
    args: &CheckInArgs,
    json_errors: bool,
) -> Result<ExitCode> {
    let speech: Box<dyn speech::SpeechNotifier> = if args.silent {
        Box::new(speech::SilentSpeech)
    } else {
        speech::from_config(&config.speech_command, speech::stdout_bell())
    };

    match runner.check_in(
        store,
        service,
        &config.markers(),
        speech.as_ref(),
        &args.worker_id,
        args.username.as_deref(),
    ) {
        Ok(report) => {
            match args.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text if report.registered => println!("{}", report.result.green()),
                OutputFormat::Text => println!("{}", report.result.red()),
            }
            Ok(ExitCode::Success)
        }
        Err(e) => report_headless_error(e, json_errors),
    }
}

/// Print an expected failure and pick its exit code. Unexpected ones propagate.
fn report_headless_error(err: HeadlessError, json_errors: bool) -> Result<ExitCode> {
    let Some(code) = err.exit_code() else {
        return Err(err.into());
    };
    eprintln!("{}", err.render(code, json_errors)?);
    Ok(code)
}
