//! Huddle session replay binary.
//!
//! # Usage
//!
//! ```bash
//! # Replay a recorded session with the built-in defaults
//! huddle --script session.jsonl
//!
//! # Replay from stdin with a notifier config, verbose logs on stderr
//! huddle --script - --config notifier.toml --log-level debug < session.jsonl
//! ```

use std::path::PathBuf;

use clap::Parser;
use huddle_app::Runtime;
use huddle_cli::{ScriptDriver, SystemEnv, open_script};
use huddle_core::NotifierConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Huddle notification session replay
#[derive(Parser, Debug)]
#[command(name = "huddle")]
#[command(about = "Replay a conferencing session through the notification runtime")]
#[command(version)]
struct Args {
    /// Session script (JSON lines), or `-` for stdin
    #[arg(short, long)]
    script: PathBuf,

    /// Path to notifier config (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with notifications disabled
    #[arg(long)]
    disable_notifications: bool,

    /// Override the join/leave debounce window in milliseconds
    #[arg(long)]
    flush_window_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // stdout carries the effect stream
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = match &args.config {
        Some(path) => NotifierConfig::load(path)?,
        None => NotifierConfig::default(),
    };
    if args.disable_notifications {
        config.enabled = false;
    }
    if let Some(window) = args.flush_window_ms {
        config.flush_window_ms = window;
        config.validate()?;
    }

    tracing::info!(script = %args.script.display(), enabled = config.enabled, "replay starting");

    let input = open_script(&args.script).await?;
    let driver = ScriptDriver::new(input, std::io::stdout());
    let app = Runtime::new(driver, SystemEnv::new(), config).run().await?;

    tracing::info!(
        visible = app.queue().len(),
        participants = app.roster().len(),
        "replay finished"
    );

    Ok(())
}
