//! iwstatus - Wireless Interface Status Tool
//!
//! Prints the wireless configuration and link statistics of network
//! interfaces in the iwconfig layout.
//!
//! # Usage
//!
//! ```bash
//! # Every interface
//! iwstatus
//!
//! # A single interface
//! iwstatus wlan0
//!
//! # Machine-readable output
//! iwstatus --output json
//! ```

use clap::Parser;
use libiwstatus::{IwConfig, IwResult, OutputFormat, Reporter, Wext};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

/// Wireless interface status
#[derive(Parser, Debug)]
#[command(name = "iwstatus")]
#[command(version, disable_version_flag = true)]
#[command(about = "Wireless Interface Status - report wireless configuration and link statistics", long_about = None)]
struct Args {
    /// Interface to report on (default: all interfaces)
    interface: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Configuration file (default: /etc/iwstatus/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,
}

fn main() {
    let args = Args::parse();

    let config = match IwConfig::resolve(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    init_logging(&args, &config);

    if let Err(e) = run(&args, &config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args, config: &IwConfig) -> IwResult<()> {
    let wext = Wext::new(&config.paths)?;
    let reporter = Reporter::new(&wext, &wext);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = reporter.run(args.interface.as_deref(), args.output, &mut out)?;

    debug!(
        "Reported {} interface(s), {} without wireless extensions, {} failed",
        summary.reported, summary.no_wireless, summary.failed
    );
    Ok(())
}

/// Initialize logging based on command-line arguments and configuration
fn init_logging(args: &Args, config: &IwConfig) {
    let log_level = if args.verbose {
        "debug"
    } else {
        args.log_level.as_deref().unwrap_or(&config.logging.level)
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            EnvFilter::new(format!("iwstatus={},libiwstatus={}", log_level, log_level))
        });

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();
}
