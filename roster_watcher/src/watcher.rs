//! The fixed-interval poll loop driving fetch, extraction, diff, and write.
//!
//! The loop owns the only mutable state in the process: the previous
//! iteration's snapshot, held in a local and replaced after each
//! successful write. Shutdown is cooperative: a `ctrlc` handler flips the
//! shared flag and the loop notices it at its suspension points (the top
//! of each cycle, right before the snapshot write, and the inter-iteration
//! sleep, which is taken in short slices so a long interval stays
//! responsive). An interrupt yields a successful result with run totals;
//! the first fetch, extraction, or write failure ends the run with that
//! error.
use crate::extractor::RosterExtractor;
use crate::fetcher::PageFetcher;
use crate::writer::SnapshotWriter;
use log::info;
use roster_common::Result;
use roster_common::roster::{RosterSnapshot, diff_snapshots};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Granularity at which the inter-iteration sleep rechecks the shutdown flag.
const SHUTDOWN_POLL_MS: u64 = 200;

/// Totals reported after a clean stop.
#[derive(Debug)]
pub struct RunSummary {
    /// Number of fully completed iterations.
    pub iterations: u64,
    /// Wall-clock time from start to stop.
    pub elapsed: Duration,
}

/// Fixed-interval watcher over one course roster.
pub struct RosterWatcher<F: PageFetcher> {
    fetcher: F,
    extractor: RosterExtractor,
    writer: SnapshotWriter,
    interval: Duration,
    shutdown: Arc<AtomicBool>,
}

impl<F: PageFetcher> RosterWatcher<F> {
    /// Wire a watcher from its collaborators and the shared shutdown flag.
    pub fn new(
        fetcher: F,
        extractor: RosterExtractor,
        writer: SnapshotWriter,
        interval: Duration,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            writer,
            interval,
            shutdown,
        }
    }

    /// Run until interrupted or until the first fatal error.
    ///
    /// Returns `Ok` with run totals on user-initiated stop; any fetch,
    /// extraction, or write failure aborts the run and is returned
    /// unchanged. There is no retry.
    pub fn run(&mut self) -> Result<RunSummary> {
        let started = Instant::now();
        let mut previous = RosterSnapshot::new();
        let mut iteration: u64 = 0;

        while !self.shutdown.load(Ordering::Relaxed) {
            info!("Updating: iteration {}", iteration);

            let page = self.fetcher.fetch_page()?;
            let observed = self.extractor.extract(&page)?;
            let current = diff_snapshots(&observed, &previous);

            // A signal that arrived mid-iteration abandons the write.
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            for (name, participant) in &current {
                if participant.logged_in {
                    info!("{} just logged in!", name);
                }
            }

            self.writer.write(&current, iteration)?;
            previous = current;
            iteration += 1;

            self.sleep_interruptibly();
        }

        Ok(RunSummary {
            iterations: iteration,
            elapsed: started.elapsed(),
        })
    }

    /// Sleep for the configured interval in short slices, returning early
    /// once the shutdown flag is observed.
    fn sleep_interruptibly(&self) {
        let step = Duration::from_millis(SHUTDOWN_POLL_MS);
        let mut remaining = self.interval;
        while !self.shutdown.load(Ordering::Relaxed) && !remaining.is_zero() {
            let slice = remaining.min(step);
            thread::sleep(slice);
            remaining -= slice;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_common::WatchError;
    use std::cell::Cell;
    use std::fs;
    use std::path::Path;

    const CONTEXT_ID: u64 = 117_430;

    fn roster_page(participants: &[(&str, &str)]) -> String {
        let mut rows = String::new();
        for (index, (name, activity)) in participants.iter().enumerate() {
            let row = index + 1;
            rows.push_str(&format!(
                concat!(
                    r#"<tr><th id="user-index-participants-{ctx}_r{row}_c1">{name}</th>"#,
                    r#"<td id="user-index-participants-{ctx}_r{row}_c4">{activity}</td></tr>"#
                ),
                ctx = CONTEXT_ID,
                row = row,
                name = name,
                activity = activity,
            ));
        }
        format!(
            concat!(
                "<html><body>",
                r#"<p data-region="participant-count">{count} participantes</p>"#,
                r#"<table id="participants"><tbody>{rows}</tbody></table>"#,
                "</body></html>"
            ),
            count = participants.len() + 1,
            rows = rows,
        )
    }

    /// Serves the given pages in order; the fetch after the last page
    /// flips the shutdown flag (as if the operator hit Ctrl+C during it)
    /// and serves the last page again.
    struct ScriptedFetcher {
        pages: Vec<String>,
        calls: Cell<usize>,
        shutdown: Arc<AtomicBool>,
    }

    impl PageFetcher for ScriptedFetcher {
        fn fetch_page(&self) -> Result<String> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if call >= self.pages.len() {
                self.shutdown.store(true, Ordering::SeqCst);
            }
            Ok(self.pages[call.min(self.pages.len() - 1)].clone())
        }
    }

    /// Flips the shutdown flag while the fetch is in flight, then returns
    /// a valid page.
    struct InterruptedFetcher {
        page: String,
        shutdown: Arc<AtomicBool>,
    }

    impl PageFetcher for InterruptedFetcher {
        fn fetch_page(&self) -> Result<String> {
            self.shutdown.store(true, Ordering::SeqCst);
            Ok(self.page.clone())
        }
    }

    /// Always reports a non-200 response.
    struct FailingFetcher;

    impl PageFetcher for FailingFetcher {
        fn fetch_page(&self) -> Result<String> {
            Err(WatchError::Fetch("Status code 500 != 200".to_string()))
        }
    }

    fn watcher_over<F: PageFetcher>(
        fetcher: F,
        output_dir: &Path,
        shutdown: Arc<AtomicBool>,
    ) -> RosterWatcher<F> {
        RosterWatcher::new(
            fetcher,
            RosterExtractor::new(CONTEXT_ID).unwrap(),
            SnapshotWriter::new(output_dir).unwrap(),
            Duration::from_millis(1),
            shutdown,
        )
    }

    fn read_snapshot(dir: &Path, iteration: u64) -> RosterSnapshot {
        let suffix = format!("_{}.json", iteration);
        let path = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .find(|path| path.to_str().unwrap().ends_with(&suffix))
            .expect("snapshot file for iteration");
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn drop_in_duration_is_written_as_a_login() {
        let dir = tempfile::tempdir().unwrap();
        let shutdown = Arc::new(AtomicBool::new(false));
        let fetcher = ScriptedFetcher {
            pages: vec![
                roster_page(&[("Alice Silva", "5 minutos")]),
                roster_page(&[("Alice Silva", "50 segundos")]),
            ],
            calls: Cell::new(0),
            shutdown: shutdown.clone(),
        };

        let summary = watcher_over(fetcher, dir.path(), shutdown)
            .run()
            .unwrap();
        assert_eq!(summary.iterations, 2);

        let first = read_snapshot(dir.path(), 0);
        assert_eq!(first["Alice Silva"].last_login_seconds, 300);
        assert!(!first["Alice Silva"].logged_in);

        let second = read_snapshot(dir.path(), 1);
        assert_eq!(second["Alice Silva"].last_login_seconds, 50);
        assert!(second["Alice Silva"].logged_in);
    }

    #[test]
    fn fetch_failure_aborts_with_nothing_written() {
        let dir = tempfile::tempdir().unwrap();
        let shutdown = Arc::new(AtomicBool::new(false));

        let err = watcher_over(FailingFetcher, dir.path(), shutdown)
            .run()
            .unwrap_err();
        assert!(matches!(err, WatchError::Fetch(_)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn preset_shutdown_stops_before_any_iteration() {
        let dir = tempfile::tempdir().unwrap();
        let shutdown = Arc::new(AtomicBool::new(true));
        let fetcher = ScriptedFetcher {
            pages: vec![roster_page(&[("Alice Silva", "5 minutos")])],
            calls: Cell::new(0),
            shutdown: shutdown.clone(),
        };

        let summary = watcher_over(fetcher, dir.path(), shutdown)
            .run()
            .unwrap();
        assert_eq!(summary.iterations, 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn signal_before_the_write_abandons_that_iteration() {
        let dir = tempfile::tempdir().unwrap();
        let shutdown = Arc::new(AtomicBool::new(false));
        // The flag flips during the very first fetch, so the loop must
        // exit without writing anything.
        let fetcher = InterruptedFetcher {
            page: roster_page(&[("Alice Silva", "5 minutos")]),
            shutdown: shutdown.clone(),
        };

        let summary = watcher_over(fetcher, dir.path(), shutdown)
            .run()
            .unwrap();
        assert_eq!(summary.iterations, 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
