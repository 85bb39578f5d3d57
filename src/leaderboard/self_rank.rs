//! Caller standing lookup.
//!
//! Finds "my rank / my total" for the viewer. Matching against the ranked
//! entries is tried first; when that fails and an address is known, the
//! raw submissions for that address are summed and placed against the
//! ranked totals. That last path is a best-effort reconciliation between
//! the by-handle and by-address groupings and may not agree exactly with
//! the ranked entries.

use crate::leaderboard::aggregator::address_total;
use crate::leaderboard::ranker::placement_for_total;
use crate::models::{AggregatedEntry, SelfMatch, SelfStanding, Submission};
use tracing::debug;

/// Locate the caller in a ranked list.
///
/// Resolution order, first match wins:
/// 1. entry address equals `caller_address`
/// 2. entry handle or display name equals `caller_handle`
/// 3. entry display name contains `caller_handle` without its `@`
/// 4. by-address fallback over the raw `submissions`
///
/// Step 3 is skipped when the handle is empty once `@` is stripped, so a
/// bare `"@"` never matches by containment.
pub fn find_self(
    ranked: &[AggregatedEntry],
    submissions: &[Submission],
    caller_address: Option<&str>,
    caller_handle: Option<&str>,
) -> Option<SelfStanding> {
    if let Some(address) = caller_address {
        if let Some(entry) = ranked
            .iter()
            .find(|e| e.identity_address.as_deref() == Some(address))
        {
            return standing(entry, SelfMatch::Address);
        }
    }

    if let Some(handle) = caller_handle {
        if let Some(entry) = ranked
            .iter()
            .find(|e| e.resolved_handle.as_deref() == Some(handle) || e.display_name == handle)
        {
            return standing(entry, SelfMatch::Handle);
        }

        let bare = handle.trim_start_matches('@');
        if !bare.is_empty() {
            if let Some(entry) = ranked.iter().find(|e| e.display_name.contains(bare)) {
                return standing(entry, SelfMatch::NameContains);
            }
        }
    }

    caller_address.and_then(|address| address_fallback(ranked, submissions, address))
}

/// Sum the caller's raw submissions by address and estimate their rank.
pub fn address_fallback(
    ranked: &[AggregatedEntry],
    submissions: &[Submission],
    address: &str,
) -> Option<SelfStanding> {
    let total_points = address_total(submissions, address)?;
    let rank = placement_for_total(ranked, total_points);
    debug!(
        "Caller {} placed by address fallback: {} points, rank {}",
        address, total_points, rank
    );

    Some(SelfStanding {
        rank,
        total_points,
        matched_by: SelfMatch::AddressFallback,
    })
}

fn standing(entry: &AggregatedEntry, matched_by: SelfMatch) -> Option<SelfStanding> {
    Some(SelfStanding {
        rank: entry.rank?,
        total_points: entry.total_points,
        matched_by,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{aggregator::aggregate, ranker::rank};

    fn submission(name: &str, address: Option<&str>, points: u64) -> Submission {
        Submission {
            display_name: name.to_string(),
            handle: None,
            url: String::new(),
            category_tags: String::new(),
            points,
            identity_address: address.map(String::from),
        }
    }

    fn fixture() -> (Vec<Submission>, Vec<AggregatedEntry>) {
        let subs = vec![
            submission("@carol", Some("C1"), 30),
            submission("alice", Some("A1"), 10),
            submission("https://x.com/bob", None, 20),
            // Same wallet as alice's entry, but grouped under a handle.
            submission("@alice_builds", Some("A1"), 25),
        ];
        let ranked = rank(aggregate(&subs));
        (subs, ranked)
    }

    #[test]
    fn test_match_by_address() {
        let (subs, ranked) = fixture();
        let me = find_self(&ranked, &subs, Some("C1"), None).unwrap();

        assert_eq!(me.rank, 1);
        assert_eq!(me.total_points, 30);
        assert_eq!(me.matched_by, SelfMatch::Address);
    }

    #[test]
    fn test_address_matches_first_entry_in_rank_order() {
        let (subs, ranked) = fixture();
        // "@alice_builds" (25) outranks "alice" (10); both carry A1.
        let me = find_self(&ranked, &subs, Some("A1"), None).unwrap();

        assert_eq!(me.rank, 2);
        assert_eq!(me.total_points, 25);
    }

    #[test]
    fn test_match_by_handle() {
        let (subs, ranked) = fixture();
        let me = find_self(&ranked, &subs, None, Some("@bob")).unwrap();

        assert_eq!(me.total_points, 20);
        assert_eq!(me.matched_by, SelfMatch::Handle);

        let by_name = find_self(&ranked, &subs, None, Some("alice")).unwrap();
        assert_eq!(by_name.total_points, 10);
        assert_eq!(by_name.matched_by, SelfMatch::Handle);
    }

    #[test]
    fn test_match_by_name_containment() {
        let subs = vec![
            submission("Dana the Builder", None, 7),
            submission("erin", None, 9),
        ];
        let ranked = rank(aggregate(&subs));

        let me = find_self(&ranked, &subs, None, Some("@Dana")).unwrap();
        assert_eq!(me.rank, 2);
        assert_eq!(me.matched_by, SelfMatch::NameContains);
    }

    #[test]
    fn test_bare_at_handle_does_not_match_everything() {
        let (subs, ranked) = fixture();
        assert_eq!(find_self(&ranked, &subs, None, Some("@")), None);
    }

    #[test]
    fn test_address_fallback() {
        // Entry for Z1 is seeded by a different address, so the address
        // lookup misses and the raw sum is used instead.
        let subs = vec![
            submission("@zed", Some("Z0"), 50),
            submission("@zed", Some("Z1"), 4),
            submission("yan", Some("Y1"), 12),
            submission("xia", Some("X1"), 3),
        ];
        let ranked = rank(aggregate(&subs));

        let me = find_self(&ranked, &subs, Some("Z1"), None).unwrap();
        assert_eq!(me.total_points, 4);
        assert_eq!(me.rank, 3);
        assert_eq!(me.matched_by, SelfMatch::AddressFallback);
    }

    #[test]
    fn test_unknown_address_is_absent() {
        let subs = vec![submission("bob", Some("B1"), 5)];
        let ranked = rank(aggregate(&subs));

        assert_eq!(find_self(&ranked, &subs, Some("A1"), None), None);
    }

    #[test]
    fn test_no_identity_is_absent() {
        let (subs, ranked) = fixture();
        assert_eq!(find_self(&ranked, &subs, None, None), None);
        assert_eq!(find_self(&[], &[], Some("A1"), Some("@a")), None);
    }
}
