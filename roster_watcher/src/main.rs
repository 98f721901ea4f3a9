//! Roster Watcher — polls a Moodle course participants page at a fixed
//! interval, extracts each participant's "time since last activity",
//! flags strict decreases as fresh logins, and writes one JSON snapshot
//! file per iteration.
//!
//! Usage example (CLI):
//! ```bash
//! roster_watcher --session <cookie> --course-id 12345 \
//!     --interval-secs 60 --output-dir ./output
//! ```
//!
//! Every flag can also come from the environment (`MOODLE_SESSION`,
//! `COURSE_ID`, `DELTA_TIME`, `OUTPUT_DIR`, ...), including a `.env` file
//! in the working directory. The process runs until Ctrl+C (clean exit
//! with a run summary) or until the first fetch, extraction, or write
//! failure (exit code 1). There is no retry.
#![warn(missing_docs)]
mod args;
mod extractor;
mod fetcher;
mod watcher;
mod writer;

use crate::args::Args;
use crate::extractor::RosterExtractor;
use crate::fetcher::HttpRosterFetcher;
use crate::watcher::{RosterWatcher, RunSummary};
use crate::writer::SnapshotWriter;
use clap::Parser;
use log::{error, info};
use roster_common::{Result, WatchError};
use std::process::ExitCode;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logger();
    let args = Args::parse();

    match run(args) {
        Ok(summary) => {
            info!(
                "Stopped cleanly after {} iterations in {:.1?}",
                summary.iterations, summary.elapsed
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Could not update infos: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Validate the configuration, wire the components, and drive the poll
/// loop to completion. Returns the run summary on a clean stop.
fn run(args: Args) -> Result<RunSummary> {
    let session = normalize_token(&args.session);
    if session.is_empty() {
        return Err(WatchError::Config(
            "Session token must not be empty".to_string(),
        ));
    }
    if args.interval_secs == 0 {
        return Err(WatchError::Config(
            "Poll interval must be at least 1 second".to_string(),
        ));
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down watcher...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .expect("Error setting Ctrl+C handler");
    }

    let fetcher = HttpRosterFetcher::new(
        &args.base_url,
        args.course_id,
        &session,
        Duration::from_secs(args.timeout_secs),
    )?;
    let extractor = RosterExtractor::new(args.context_id)?;
    let writer = SnapshotWriter::new(&args.output_dir)?;

    info!(
        "Watching course {} every {}s. Press Ctrl+C to exit.",
        args.course_id, args.interval_secs
    );
    let mut watcher = RosterWatcher::new(
        fetcher,
        extractor,
        writer,
        Duration::from_secs(args.interval_secs),
        shutdown,
    );
    watcher.run()
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI- or env-provided token by trimming whitespace and
/// surrounding quotes.
///
/// This allows passing quoted values from shells or `.env` files without
/// breaking the cookie header.
fn normalize_token(raw: &str) -> String {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    no_quotes.to_string()
}
