//! Parley - a line-oriented command shell.

mod cli;

use cli::Cli;
use parley::commands::{builtin_registry, ConsoleTerminal, Dispatcher, Profile, Session};
use parley::config::Config;
use parley::error::{ParleyError, Result};
use parley::host::Host;
use parley::logging;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse_args();

    if cli.log_file {
        logging::init_file_logging(cli.verbose);
    } else {
        logging::init_stderr_logging(cli.verbose);
    }

    if let Err(e) = run(&cli) {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.apply_env_overrides()?;
    cli.apply(&mut config);

    let format = cli.parse_output_format().map_err(ParleyError::config)?;

    let profile = Profile::new();
    let registry = builtin_registry(config.dispatch.name_matching, &profile);
    let dispatcher = Dispatcher::with_settings(registry, config.dispatch.settings());
    let terminal = ConsoleTerminal::handle("console", config.session.resolved_user());
    let mut host = Host::new(dispatcher, Session::new(terminal)).with_format(format);

    let mut stdout = io::stdout().lock();
    let summary = match cli.script_path() {
        Some(path) => {
            let file = File::open(&path).map_err(|e| {
                ParleyError::config(format!("Failed to open script {}: {e}", path.display()))
            })?;
            host.run(BufReader::new(file), &mut stdout, None)?
        }
        None => {
            let stdin = io::stdin();
            let prompt = (cli.script.is_none() && stdin.is_terminal())
                .then_some(config.session.prompt.as_str());
            host.run(stdin.lock(), &mut stdout, prompt)?
        }
    };

    if let Some(label) = &summary.abandoned {
        info!(label = label.as_str(), "Input ended while an interaction was waiting");
    }
    info!(
        lines = summary.lines,
        responses = summary.responses,
        "Session ended after {:?}",
        summary.duration
    );
    Ok(())
}
