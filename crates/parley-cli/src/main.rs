//! Parley chat-room runner.
//!
//! # Usage
//!
//! ```bash
//! # Run the built-in demo
//! parley
//!
//! # Run a script, echoing broadcasts back to their sender
//! parley --script room.txt --include-sender
//!
//! # Fail the process if any command fails
//! parley --script room.txt --strict
//! ```

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;
use parley_cli::{DEMO_SCRIPT, run_script};
use parley_core::{DEFAULT_MAX_DELIVERY_DEPTH, DuplicatePolicy, MediatorConfig, SenderPolicy};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Parley chat-room runner
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Run a chat-room script through a message mediator")]
#[command(version)]
struct Args {
    /// Script file; runs the built-in demo when omitted
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Deliver broadcasts back to their sender
    #[arg(long)]
    include_sender: bool,

    /// Let a new registration replace an existing one with the same name
    #[arg(long)]
    replace_duplicates: bool,

    /// Maximum nested deliveries per thread
    #[arg(long, default_value_t = DEFAULT_MAX_DELIVERY_DEPTH)]
    max_depth: usize,

    /// Exit with an error if any command failed
    #[arg(long)]
    strict: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn mediator_config(&self) -> MediatorConfig {
        let sender = if self.include_sender {
            SenderPolicy::IncludeSender
        } else {
            SenderPolicy::ExcludeSender
        };
        let duplicates =
            if self.replace_duplicates { DuplicatePolicy::Replace } else { DuplicatePolicy::Reject };

        MediatorConfig::default()
            .with_sender_policy(sender)
            .with_duplicate_policy(duplicates)
            .with_max_delivery_depth(self.max_depth)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let source = match &args.script {
        Some(path) => {
            tracing::info!("Running script {}", path.display());
            fs::read_to_string(path)?
        },
        None => DEMO_SCRIPT.to_string(),
    };

    let outcome = run_script(&source, args.mediator_config())?;

    let mut out = io::stdout().lock();
    for line in &outcome.lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    if args.strict {
        outcome.check()?;
    } else if outcome.failed > 0 {
        tracing::warn!(failed = outcome.failed, total = outcome.total, "some commands failed");
    }

    Ok(())
}
