// changelog CLI entry point.
// Parses arguments, sets up logging and runs the pull pipeline.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use changelog::{ChangelogError, Renderer};

/// Latest release changelogs for subscribed GitHub repositories.
#[derive(Parser, Debug)]
#[command(name = "changelog", version, about)]
struct Cli {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print the latest changelog of every subscription in changelog.conf.
    Pull,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match execute(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing subscriber. Logs go to stderr so stdout carries only
/// the changelog.
fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn execute(command: Command) -> Result<(), ChangelogError> {
    match command {
        Command::Pull => {
            let workdir = std::env::current_dir()?;
            let stdout = io::stdout();
            let styled = stdout.is_terminal();
            let mut renderer = Renderer::new(stdout, styled);
            changelog::run(&workdir, &mut renderer).await?;
            Ok(())
        }
    }
}
