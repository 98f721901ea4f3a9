//! Snapshot persistence, one JSON file per iteration.
//!
//! Every iteration produces a fresh timestamped file; nothing is appended
//! or overwritten, so the output directory accumulates the full polling
//! history. The written document is an object keyed by participant name,
//! each value carrying `last_login_seconds` and `logged_in`.
use chrono::Local;
use log::debug;
use roster_common::Result;
use roster_common::roster::RosterSnapshot;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name prefix shared by all snapshot files.
const FILE_PREFIX: &str = "moodle-polling";

/// Writes each iteration's snapshot as a timestamped JSON file.
pub struct SnapshotWriter {
    output_dir: PathBuf,
}

impl SnapshotWriter {
    /// Create a writer rooted at `output_dir`, creating the directory
    /// (and any missing parents) if it does not exist yet.
    pub fn new(output_dir: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Serialize `snapshot` to a new file for `iteration`.
    ///
    /// The file name combines the fixed prefix, the current wall-clock
    /// time at one-second resolution, and the iteration index. Returns the
    /// path written; any I/O or encoding failure propagates unchanged.
    pub fn write(&self, snapshot: &RosterSnapshot, iteration: u64) -> Result<PathBuf> {
        let stamp = Local::now().format("%d-%m-%Y_%H-%M-%S");
        let path = self
            .output_dir
            .join(format!("{}-{}_{}.json", FILE_PREFIX, stamp, iteration));

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.flush()?;

        debug!("Snapshot written to {}", path.display());
        Ok(path)
    }
}
