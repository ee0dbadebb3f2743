// rostercheck - seminar roster versus listing reconciliation

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "rostercheck")]
#[command(about = "Check the seminar roster against the published listings")]
#[command(version)]
struct Cli {
    /// Log debug detail (per-slot decisions, dropped records) to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the check from a TOML config file
    #[command(after_help = "\
Examples:
  rostercheck run seminars.recon.toml
  rostercheck run seminars.recon.toml --json
  rostercheck run seminars.recon.toml --output report.json
  rostercheck run seminars.recon.toml --today 2026-01-05

Exit codes: 0 nothing needs action, 1 priority items found,
            2 usage, 3 invalid config, 4 runtime error")]
    Run {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Print the JSON report to stdout instead of only the summary
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Date to treat as today (YYYY-MM-DD); defaults to the local date
        #[arg(long, env = "ROSTERCHECK_TODAY")]
        today: Option<String>,
    },

    /// Validate a config without running
    #[command(after_help = "\
Examples:
  rostercheck validate seminars.recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .ok();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            config,
            json,
            output,
            today,
        } => recon::cmd_run(config, json, output, today),
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
