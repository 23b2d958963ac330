//! Server status checker CLI
//!
//! Polls the status API and posts changes of the tracked server to Discord.

use std::path::PathBuf;

use clap::Parser;
use status_checker::{config, error::Result, pipeline::StatusChecker};

/// status-checker - Discord notifications for server status changes
#[derive(Parser, Debug)]
#[command(
    name = "status-checker",
    version,
    about = "Posts server status changes to a Discord webhook"
)]
struct Cli {
    /// Optional TOML configuration file; environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run one cycle and always post, ignoring the stored state
    #[arg(long)]
    debug: bool,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    config::load_dotenv();

    let mut config = config::load_config(cli.config.as_deref()).inspect_err(|e| {
        log::error!("{}", e);
    })?;
    if cli.debug {
        config.debug = true;
    }

    log::info!(
        "Tracking {} every {} (state file {})",
        config.server_name,
        humantime::format_duration(config.interval),
        config.state_path().display()
    );

    let checker = StatusChecker::from_config(&config)?;

    if cli.once && !config.debug {
        checker.run_cycle().await;
    } else {
        checker.run().await;
    }

    Ok(())
}
