use anyhow::Context;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

use fritz_dect_mail_extract::config::AppConfig;
use fritz_dect_mail_extract::helpers::credentials::{CredentialChain, ExplicitProvider};
use fritz_dect_mail_extract::{ExtractionManager, ExtractionSummary};

/// Extract FritzDect status mails (i.e. Energy usage) sent from FritzBox via IMAP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to directory to save files
    target_folder: PathBuf,

    /// IMAP server, optionally with `:port`. Defaults to environment variable FRITZ_DECT_SERVER
    #[arg(long)]
    server: Option<String>,

    /// IMAP username. Defaults to environment variable FRITZ_DECT_USERNAME
    #[arg(long)]
    username: Option<String>,

    /// IMAP password. Defaults to environment variable FRITZ_DECT_PASSWORD
    #[arg(long)]
    password: Option<String>,

    /// Config file (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Never prompt and never touch the keychain
    #[arg(long)]
    no_interactive: bool,

    #[arg(long)]
    log_file_path: Option<String>,

    /// Set loglevel to INFO, twice for DEBUG
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Set loglevel to DEBUG
    #[arg(long)]
    very_verbose: bool,
}

impl Args {
    fn log_level(&self) -> &'static str {
        match (self.very_verbose, self.verbose) {
            (true, _) | (false, 2..) => "debug",
            (false, 1) => "info",
            (false, 0) => "warn",
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let _guard = match init_tracing(args.log_level(), args.log_file_path.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!("Starting extraction");
    match run(args) {
        Ok(summary) => {
            tracing::info!(
                "Extracted {} mails with {} rows into '{}'",
                summary.mails,
                summary.rows,
                summary.combined_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExtractionSummary> {
    let (config, config_path) = AppConfig::load(args.config.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    tracing::debug!("Using config {:?}: {:?}", config_path, config);

    // The folder is checked before asking for credentials.
    let manager = ExtractionManager::new(&args.target_folder, config)?;

    let explicit = ExplicitProvider::new(args.server, args.username, args.password);
    let server_data = CredentialChain::standard(explicit, !args.no_interactive).resolve()?;

    Ok(manager.run(&server_data)?)
}

fn init_tracing(level: &str, log_file_path: Option<&str>) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some(log_path) = log_file_path else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stdout)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(None);
    };

    let log_path = std::path::Path::new(log_path);
    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(std::path::Path::new(".")),
        log_path
            .file_name()
            .unwrap_or(std::ffi::OsStr::new("fritz-dect-mail-extract.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_writer(std::io::stdout),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(Some(guard))
}
