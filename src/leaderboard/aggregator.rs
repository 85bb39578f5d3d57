//! Submission aggregation.
//!
//! Folds a flat list of submissions into one entry per participant.
//! Two strategies exist and are kept apart: grouping by
//! resolved handle (the leaderboard default) and grouping by wallet
//! address. They do not agree when a participant submitted under both
//! a wallet-linked and a handle-linked identity.

use crate::leaderboard::identity;
use crate::models::{AggregatedEntry, Submission};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Group submissions by canonical identity key, summing points.
///
/// Output order is the first-seen order of each key. A submission whose
/// points would overflow its entry's total is logged and left out.
pub fn aggregate(submissions: &[Submission]) -> Vec<AggregatedEntry> {
    let mut entries: Vec<AggregatedEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for submission in submissions {
        let (key, resolved) = identity::identify(submission);

        match index.get(&key).copied() {
            Some(pos) => absorb_or_skip(&mut entries[pos], submission),
            None => {
                index.insert(key.clone(), entries.len());
                entries.push(AggregatedEntry::seed(key, resolved, submission.clone()));
            }
        }
    }

    report_unresolved_bucket(&entries);
    debug!(
        "Aggregated {} submissions into {} entries by handle",
        submissions.len(),
        entries.len()
    );

    entries
}

/// Group submissions by wallet address, summing points.
///
/// Submissions without an address share the empty-key bucket. The
/// display name and handle come from the first submission seen.
pub fn aggregate_by_address(submissions: &[Submission]) -> Vec<AggregatedEntry> {
    let mut entries: Vec<AggregatedEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for submission in submissions {
        let key = submission.identity_address.clone().unwrap_or_default();

        match index.get(&key).copied() {
            Some(pos) => absorb_or_skip(&mut entries[pos], submission),
            None => {
                let resolved = identity::resolve_handle(
                    &submission.display_name,
                    submission.handle.as_deref(),
                );
                index.insert(key.clone(), entries.len());
                entries.push(AggregatedEntry::seed(key, resolved, submission.clone()));
            }
        }
    }

    report_unresolved_bucket(&entries);
    debug!(
        "Aggregated {} submissions into {} entries by address",
        submissions.len(),
        entries.len()
    );

    entries
}

/// Sum of raw points over submissions tied to `address`.
///
/// Returns `None` when no submission carries that address. Submissions
/// that would overflow the running sum are skipped, as in aggregation.
pub fn address_total(submissions: &[Submission], address: &str) -> Option<u64> {
    let mut owned = submissions
        .iter()
        .filter(|s| s.identity_address.as_deref() == Some(address))
        .peekable();

    owned.peek()?;
    Some(owned.fold(0u64, |total, s| total.checked_add(s.points).unwrap_or(total)))
}

fn absorb_or_skip(entry: &mut AggregatedEntry, submission: &Submission) {
    if !entry.absorb(submission.clone()) {
        warn!(
            "Skipping {} points for {:?}: total would exceed {}",
            submission.points,
            entry.canonical_key,
            u64::MAX
        );
    }
}

fn report_unresolved_bucket(entries: &[AggregatedEntry]) {
    if let Some(bucket) = entries.iter().find(|e| e.is_unresolved_bucket()) {
        warn!(
            "{} submission(s) have no usable identity and were grouped under an empty key ({} points)",
            bucket.members.len(),
            bucket.total_points
        );
    }
}
