//! Command-line argument parsing for Parley.

use clap::Parser;
use parley::commands::FaultPolicy;
use parley::commands::NameMatching;
use parley::config::Config;
use parley::host::OutputFormat;
use std::path::PathBuf;

/// A line-oriented command shell with overloaded commands and interactions.
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log full error detail for recovered failures
    #[arg(short, long)]
    pub verbose: bool,

    /// Log and skip faulting commands instead of reporting them
    #[arg(long)]
    pub harden: bool,

    /// Match command names without regard to case
    #[arg(long)]
    pub case_insensitive: bool,

    /// Read commands from a file instead of stdin (use "-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Output format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Write logs to the state directory instead of stderr
    #[arg(long)]
    pub log_file: bool,

    /// User name reported to commands
    #[arg(short = 'U', long, value_name = "USER", env = "PARLEY_USER")]
    pub user: Option<String>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Parses the output format argument.
    pub fn parse_output_format(&self) -> Result<OutputFormat, String> {
        self.output.parse()
    }

    /// Returns the script path, treating "-" as stdin.
    pub fn script_path(&self) -> Option<PathBuf> {
        match self.script.as_deref() {
            None | Some("-") => None,
            Some(path) => Some(PathBuf::from(path)),
        }
    }

    /// Applies flags over the loaded configuration. Flags only ever switch
    /// behaviour on; they never undo a setting from the file.
    pub fn apply(&self, config: &mut Config) {
        if self.verbose {
            config.dispatch.verbose_errors = true;
        }
        if self.harden {
            config.dispatch.fault_policy = FaultPolicy::Harden;
        }
        if self.case_insensitive {
            config.dispatch.name_matching = NameMatching::CaseInsensitive;
        }
        if let Some(user) = &self.user {
            config.session.user = Some(user.clone());
        }
    }
}
