//! Participant records, roster snapshots, and the presence differ.
//!
//! A snapshot is the roster state captured at one poll iteration: for every
//! display name observed in the participants table, the seconds elapsed
//! since that participant's last activity and a derived `logged_in` flag.
//! The flag is computed by [`diff_snapshots`], a pure function of the
//! freshly observed durations and the immediately-previous snapshot: a
//! strict decrease in the elapsed-time counter means the participant was
//! active since the last poll.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Presence record derived for a single participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Seconds since the participant's last recorded activity, as reported
    /// by the source page at fetch time. Not an absolute timestamp.
    pub last_login_seconds: u64,
    /// True only when the last-activity counter dropped since the previous
    /// snapshot, implying a fresh activity event.
    pub logged_in: bool,
}

/// Roster state captured at one poll iteration, keyed by display name.
pub type RosterSnapshot = BTreeMap<String, Participant>;

/// Raw name-to-seconds mapping produced by the extractor, before diffing.
pub type ObservedDurations = BTreeMap<String, u64>;

/// Build the current snapshot from freshly observed durations.
///
/// `logged_in` is true iff the name existed in `previous` and its stored
/// duration is strictly greater than the observed one. New names and
/// unchanged or increased durations yield false. Names absent from
/// `current` simply do not appear — there is no tombstoning.
pub fn diff_snapshots(current: &ObservedDurations, previous: &RosterSnapshot) -> RosterSnapshot {
    current
        .iter()
        .map(|(name, &seconds)| {
            let logged_in = previous
                .get(name)
                .map(|prev| prev.last_login_seconds > seconds)
                .unwrap_or(false);
            (
                name.clone(),
                Participant {
                    last_login_seconds: seconds,
                    logged_in,
                },
            )
        })
        .collect()
}
