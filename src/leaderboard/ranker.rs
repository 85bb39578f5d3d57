//! Leaderboard ranking.

use crate::models::AggregatedEntry;

/// Sort entries by total points (highest first) and assign 1-based ranks.
///
/// The sort is stable: entries with equal totals keep their aggregation
/// order, so identical input always yields identical ranks.
pub fn rank(mut entries: Vec<AggregatedEntry>) -> Vec<AggregatedEntry> {
    entries.sort_by(|a, b| b.total_points.cmp(&a.total_points));

    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = Some(index + 1);
    }

    entries
}

/// Where a total would place against an already ranked list.
///
/// Counts the entries with a strictly greater total, plus one.
pub fn placement_for_total(ranked: &[AggregatedEntry], total_points: u64) -> usize {
    ranked
        .iter()
        .filter(|e| e.total_points > total_points)
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Submission;

    fn entry(key: &str, total: u64) -> AggregatedEntry {
        AggregatedEntry::seed(
            key.to_string(),
            None,
            Submission {
                display_name: key.to_string(),
                handle: None,
                url: String::new(),
                category_tags: String::new(),
                points: total,
                identity_address: None,
            },
        )
    }

    #[test]
    fn test_rank_descending() {
        let ranked = rank(vec![entry("a", 30), entry("b", 10), entry("c", 20)]);

        let totals: Vec<u64> = ranked.iter().map(|e| e.total_points).collect();
        let ranks: Vec<usize> = ranked.iter().filter_map(|e| e.rank).collect();
        assert_eq!(totals, vec![30, 20, 10]);
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(vec![
            entry("first", 5),
            entry("top", 9),
            entry("second", 5),
            entry("third", 5),
        ]);

        let keys: Vec<&str> = ranked.iter().map(|e| e.canonical_key.as_str()).collect();
        assert_eq!(keys, vec!["top", "first", "second", "third"]);
        assert_eq!(ranked[3].rank, Some(4));
    }

    #[test]
    fn test_rank_monotonic() {
        let ranked = rank(vec![
            entry("a", 3),
            entry("b", 8),
            entry("c", 0),
            entry("d", 8),
            entry("e", 1),
        ]);

        for pair in ranked.windows(2) {
            assert!(pair[0].total_points >= pair[1].total_points);
        }
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(Vec::new()).is_empty());
    }

    #[test]
    fn test_placement_for_total() {
        let ranked = rank(vec![entry("a", 30), entry("b", 20), entry("c", 10)]);

        assert_eq!(placement_for_total(&ranked, 25), 2);
        assert_eq!(placement_for_total(&ranked, 20), 2);
        assert_eq!(placement_for_total(&ranked, 100), 1);
        assert_eq!(placement_for_total(&ranked, 0), 4);
        assert_eq!(placement_for_total(&[], 0), 1);
    }
}
