// # ddns - single-pass DDNS reconciler
//
// Thin integration layer: parse arguments, set up logging, load the
// configuration, run one pass of `DdnsEngine`, report, exit. All DNS logic
// lives in ddns-core and the provider/resolver crates.
//
// Meant to be run by cron or a systemd timer; there is no loop and no retry.
//
// ## Usage
//
// ```bash
// ddns /etc/ddns/ddns.toml
// ddns --dry-run /etc/ddns/ddns.toml
// DDNS_LOG_LEVEL=debug ddns /etc/ddns/ddns.toml
// ```
//
// ## Output
//
// - stdout: one timestamped line per record that was changed
// - stderr: one timestamped diagnostic line on failure, plus `tracing` logs
//
// Timestamps are second-precision UTC ISO 8601.

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use clap::error::ErrorKind;
use ddns_core::{DdnsConfig, DdnsEngine, ReconcileOutcome, Reconciler};
use ddns_ip_http::HttpAddressResolver;
use ddns_provider_cloudflare::CloudflareProvider;
use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Pass completed (records updated, already current, or dry run)
/// - 1: Configuration or startup error, nothing was sent
/// - 2: Runtime error (network, HTTP status, missing record)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Pass completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error during the pass
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Keep a Cloudflare A/AAAA record in line with this host's public address
#[derive(Debug, Parser)]
#[command(name = "ddns", version)]
struct Cli {
    /// Path to the TOML configuration file
    config: PathBuf,

    /// Look up records but do not write them (also: DDNS_MODE=dry-run)
    #[arg(long)]
    dry_run: bool,

    /// Log level for diagnostics on stderr
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn dry_run(&self) -> bool {
        self.dry_run
            || std::env::var("DDNS_MODE")
                .map(|mode| mode.eq_ignore_ascii_case("dry-run"))
                .unwrap_or(false)
    }

    fn level(&self) -> Option<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return DdnsExitCode::Success.into();
        }
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => {
            report_error("Must provide configuration file path as first argument.");
            return DdnsExitCode::ConfigError.into();
        }
        Err(e) => {
            let message = e.to_string();
            report_error(message.lines().next().unwrap_or("Invalid arguments"));
            return DdnsExitCode::ConfigError.into();
        }
    };

    let Some(log_level) = cli.level() else {
        report_error(format!(
            "Log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            cli.log_level
        ));
        return DdnsExitCode::ConfigError.into();
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        report_error(format!("Failed to set tracing subscriber: {}", e));
        return DdnsExitCode::ConfigError.into();
    }

    let config = match DdnsConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            report_error(e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    info!("Configuration loaded for {}", config.hostname());
    debug!("{:?}", config);

    // Single pass, one request at a time
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")
    {
        Ok(runtime) => runtime,
        Err(e) => {
            report_error(format!("{:#}", e));
            return DdnsExitCode::RuntimeError.into();
        }
    };

    match rt.block_on(run_pass(&config, cli.dry_run())) {
        Ok(()) => DdnsExitCode::Success.into(),
        Err(e) => {
            report_error(&e);
            if e.is_config() {
                DdnsExitCode::ConfigError.into()
            } else {
                DdnsExitCode::RuntimeError.into()
            }
        }
    }
}

/// Build the components from `config` and run one pass
async fn run_pass(config: &DdnsConfig, dry_run: bool) -> ddns_core::Result<()> {
    let resolver = HttpAddressResolver::from_config(config)?;
    let provider = CloudflareProvider::from_config(config, dry_run)?;
    let reconciler = Reconciler::new(Box::new(provider), config);
    let engine = DdnsEngine::new(Box::new(resolver), reconciler, config);

    engine.run(report_outcome).await?;
    Ok(())
}

/// Print a confirmation for records that changed (or would have)
fn report_outcome(outcome: &ReconcileOutcome) {
    match outcome {
        ReconcileOutcome::Unchanged { .. } => info!("{}", outcome),
        ReconcileOutcome::Updated { .. } | ReconcileOutcome::DryRun { .. } => {
            println!("{} {}", timestamp(), outcome);
        }
    }
}

fn report_error(error: impl Display) {
    eprintln!("{} {}", timestamp(), error);
}

/// Current time as a second-precision ISO 8601 UTC timestamp
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}
