//! Command-line arguments for the Roster Watcher.
//!
//! This module defines the CLI interface using `clap`. Every setting can
//! also come from the environment (including a `.env` file loaded at
//! startup), matching how the tool is usually deployed. See `main` for
//! end-to-end usage.
use clap::Parser;
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Moodle session cookie value used to authenticate the roster request.
    #[clap(long, env = "MOODLE_SESSION", hide_env_values = true)]
    pub session: String,

    /// Course id whose participant roster is polled.
    #[clap(long, env = "COURSE_ID")]
    pub course_id: u64,

    /// Seconds to wait between poll iterations.
    #[clap(long, env = "DELTA_TIME")]
    pub interval_secs: u64,

    /// Directory where per-iteration snapshot files are written.
    /// Created before the loop starts if it does not exist.
    #[clap(long, env = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Numeric context id embedded in the participants table's per-row
    /// element ids. Controlled by the upstream page, so kept configurable.
    #[clap(long, env = "CONTEXT_ID", default_value_t = 117_430)]
    pub context_id: u64,

    /// Base URL of the Moodle instance hosting the roster.
    #[clap(long, env = "BASE_URL", default_value = "https://edisciplinas.usp.br")]
    pub base_url: String,

    /// HTTP request timeout in seconds for the roster fetch.
    #[clap(long, default_value_t = 30)]
    pub timeout_secs: u64,
}
