//! Free-text leaderboard search.

use crate::models::AggregatedEntry;

/// Narrow a ranked list to entries matching `query`.
///
/// Matching is a case-insensitive substring test against the display
/// name, resolved handle and address. An empty or whitespace-only query
/// returns everything. Ranks are left untouched.
pub fn filter<'a>(entries: &'a [AggregatedEntry], query: &str) -> Vec<&'a AggregatedEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.iter().collect();
    }

    entries
        .iter()
        .filter(|entry| matches(entry, &needle))
        .collect()
}

fn matches(entry: &AggregatedEntry, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(entry.display_name.as_str())
        || entry.resolved_handle.as_deref().is_some_and(contains)
        || entry.identity_address.as_deref().is_some_and(contains)
}

/// Human-readable outcome of a search, shown above the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchSummary {
    /// No query was given and the board is empty.
    NoEntries,
    /// A query was given and nothing matched.
    NoResults { query: String },
    /// A query was given and `count` entries matched.
    Found { query: String, count: usize },
    /// No query; the whole board is shown.
    All,
}

impl SearchSummary {
    pub fn new(query: Option<&str>, count: usize) -> Self {
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) if count == 0 => SearchSummary::NoResults {
                query: q.to_string(),
            },
            Some(q) => SearchSummary::Found {
                query: q.to_string(),
                count,
            },
            None if count == 0 => SearchSummary::NoEntries,
            None => SearchSummary::All,
        }
    }

    /// Returns the summary line, if one should be shown.
    pub fn message(&self) -> Option<String> {
        match self {
            SearchSummary::NoEntries => Some("No entries found".to_string()),
            SearchSummary::NoResults { query } => Some(format!(
                "No results found for \"{}\". Try adjusting your search terms.",
                query
            )),
            SearchSummary::Found { query, count } => Some(format!(
                "Found {} result{} for \"{}\"",
                count,
                if *count == 1 { "" } else { "s" },
                query
            )),
            SearchSummary::All => None,
        }
    }
}
