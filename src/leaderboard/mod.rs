//! Leaderboard aggregation and ranking engine.
//!
//! A [`Leaderboard`] is an immutable snapshot computed from scratch from
//! the full submission list. New data means building a new snapshot.

pub mod aggregator;
pub mod identity;
pub mod ranker;
pub mod search;
pub mod self_rank;

pub use search::SearchSummary;

use crate::models::{AggregatedEntry, GroupBy, SelfStanding, Submission};
use tracing::info;

/// Ranked leaderboard over one set of submissions.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    submissions: Vec<Submission>,
    entries: Vec<AggregatedEntry>,
    group_by: GroupBy,
}

impl Leaderboard {
    /// Aggregate and rank `submissions`.
    pub fn build(submissions: Vec<Submission>, group_by: GroupBy) -> Self {
        let aggregated = match group_by {
            GroupBy::Handle => aggregator::aggregate(&submissions),
            GroupBy::Address => aggregator::aggregate_by_address(&submissions),
        };
        let entries = ranker::rank(aggregated);

        info!(
            "Ranked {} participants from {} submissions (grouped by {})",
            entries.len(),
            submissions.len(),
            group_by
        );

        Self {
            submissions,
            entries,
            group_by,
        }
    }

    /// The full ranked list.
    pub fn entries(&self) -> &[AggregatedEntry] {
        &self.entries
    }

    /// The submissions this snapshot was built from.
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn group_by(&self) -> GroupBy {
        self.group_by
    }

    /// Sum of all points on the board.
    ///
    /// Widened to `u128` so the sum of many large entries stays exact.
    pub fn total_points(&self) -> u128 {
        self.entries.iter().map(|e| u128::from(e.total_points)).sum()
    }

    /// Entries matching a free-text query, with their full-board ranks.
    pub fn search(&self, query: &str) -> Vec<&AggregatedEntry> {
        search::filter(&self.entries, query)
    }

    /// The caller's rank and total, if they can be placed.
    pub fn find_self(
        &self,
        caller_address: Option<&str>,
        caller_handle: Option<&str>,
    ) -> Option<SelfStanding> {
        self_rank::find_self(
            &self.entries,
            &self.submissions,
            caller_address,
            caller_handle,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_scenario_single_participant() {
        let board = Leaderboard::build(
            vec![
                submission("alice", Some("A1"), 10),
                submission("alice", Some("A1"), 5),
            ],
            GroupBy::Handle,
        );

        assert_eq!(board.entries().len(), 1);
        assert_eq!(board.entries()[0].total_points, 15);
        assert_eq!(board.entries()[0].rank, Some(1));
    }

    #[test]
    fn test_scenario_handle_merge() {
        let board = Leaderboard::build(
            vec![
                submission("@bob", None, 20),
                submission("https://x.com/bob", None, 5),
            ],
            GroupBy::Handle,
        );

        assert_eq!(board.entries().len(), 1);
        assert_eq!(board.entries()[0].resolved_handle.as_deref(), Some("@bob"));
        assert_eq!(board.entries()[0].total_points, 25);
    }

    #[test]
    fn test_scenario_three_participants() {
        let board = Leaderboard::build(
            vec![
                submission("a", None, 30),
                submission("b", None, 10),
                submission("c", None, 20),
            ],
            GroupBy::Handle,
        );

        let totals: Vec<u64> = board.entries().iter().map(|e| e.total_points).collect();
        let ranks: Vec<Option<usize>> = board.entries().iter().map(|e| e.rank).collect();
        assert_eq!(totals, vec![30, 20, 10]);
        assert_eq!(ranks, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_scenario_unknown_caller() {
        let board = Leaderboard::build(vec![submission("bob", Some("B1"), 5)], GroupBy::Handle);
        assert_eq!(board.find_self(Some("A1"), None), None);
    }

    #[test]
    fn test_scenario_search_keeps_rank() {
        let board = Leaderboard::build(
            vec![submission("bob", None, 20), submission("alice", None, 10)],
            GroupBy::Handle,
        );

        let hits = board.search("ali");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].display_name, "alice");
        assert_eq!(hits[0].rank, Some(2));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let subs = vec![
            submission("@x", Some("A"), 3),
            submission("y", Some("B"), 3),
            submission("https://twitter.com/x", None, 4),
            submission("z", None, 7),
        ];

        let first = Leaderboard::build(subs.clone(), GroupBy::Handle);
        let second = Leaderboard::build(subs, GroupBy::Handle);
        assert_eq!(first.entries(), second.entries());
        assert_eq!(first.total_points(), 17);
    }

    #[test]
    fn test_empty_board() {
        let board = Leaderboard::build(Vec::new(), GroupBy::Handle);

        assert!(board.entries().is_empty());
        assert!(board.search("anything").is_empty());
        assert_eq!(board.total_points(), 0);
        assert_eq!(board.find_self(Some("A1"), Some("@a")), None);
    }

    #[test]
    fn test_large_totals_stay_exact() {
        let half = u64::MAX / 2 + 1;
        let board = Leaderboard::build(
            vec![
                submission("a", None, half),
                submission("a", None, half),
                submission("b", None, u64::MAX),
                submission("c", None, 5),
            ],
            GroupBy::Handle,
        );

        let totals: Vec<(&str, u64)> = board
            .entries()
            .iter()
            .map(|e| (e.canonical_key.as_str(), e.total_points))
            .collect();
        assert_eq!(totals, vec![("b", u64::MAX), ("a", half), ("c", 5)]);
        assert_eq!(
            board.total_points(),
            u128::from(u64::MAX) + u128::from(half) + 5
        );
    }

    #[test]
    fn test_group_by_address() {
        let board = Leaderboard::build(
            vec![
                submission("@bob", Some("B1"), 2),
                submission("bobby", Some("B1"), 3),
                submission("@bob", Some("B2"), 4),
            ],
            GroupBy::Address,
        );

        assert_eq!(board.group_by(), GroupBy::Address);
        assert_eq!(board.entries().len(), 2);
        assert_eq!(board.entries()[0].canonical_key, "B1");
        assert_eq!(board.entries()[0].total_points, 5);
        assert_eq!(board.submissions().len(), 3);
    }
}
