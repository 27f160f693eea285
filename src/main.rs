//! Cassette CLI
//!
//! Imports recorded API traffic from an integration test run into a new
//! cassette revision.

use clap::{Parser, Subcommand};
use colored::*;
use env_logger::Env;
use log::debug;
use std::process::ExitCode;

use cassette_cli::commands::{execute_import, validate_args, CompletionOutcome, ImportArgs};
use cassette_cli::output::ConsoleReporter;
use cassette_cli::utils::config::{API_URL_ENV, DEFAULT_API_URL};

/// Cassette - import API recordings from your test suite
#[derive(Parser, Debug)]
#[command(name = "cassette")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Show command output, error details and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a new revision of your API to cassette
    Import {
        /// Project to import into
        #[arg(long)]
        project_id: u64,

        /// Access token of the project
        #[arg(long)]
        project_access_token: String,

        /// Branch receiving the revision (created if missing)
        #[arg(long)]
        branch_name: String,

        /// Optional name of the new revision
        #[arg(long)]
        revision_name: Option<String>,

        /// Shell command running your integration tests
        #[arg(long)]
        command: String,

        /// Cassette API base URL
        #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL, hide = true)]
        api_url: String,
    },

    /// Display version information
    Version,
}

fn main() -> ExitCode {
    // Parse CLI arguments; usage errors are fatal like any other step
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Import {
            project_id,
            project_access_token,
            branch_name,
            revision_name,
            command,
            api_url,
        } => {
            let args = ImportArgs {
                api_url,
                project_id,
                project_access_token,
                branch_name,
                revision_name,
                command,
                verbose: cli.verbose,
            };
            run_import(&args)
        }

        Commands::Version => {
            display_version();
            ExitCode::SUCCESS
        }
    }
}

/// Validate and execute an import, mapping the result to an exit code
///
/// **Private** - internal command implementation
fn run_import(args: &ImportArgs) -> ExitCode {
    if let Err(e) = validate_args(args) {
        eprintln!("{} {:#}", "✖".red(), e);
        return ExitCode::FAILURE;
    }

    let mut reporter = ConsoleReporter::stderr(args.verbose);

    match execute_import(args, &mut reporter) {
        Ok(report) => {
            if report.outcome == CompletionOutcome::Created {
                debug!("Revision available at {}", report.revision_path());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            reporter.report_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Cassette CLI v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Imports recorded API traffic from integration tests into cassette.");
}
