//! Data models for the leaderboard.
//!
//! This module contains the core data structures used throughout
//! the application: raw submissions, aggregated entries, the caller's
//! standing and the rendered report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scored submission, as received from the points process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Free-form name as entered by the submitter.
    pub display_name: String,
    /// Canonical social handle, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Link to the submitted content (may be empty).
    pub url: String,
    /// Comma-separated category labels.
    pub category_tags: String,
    /// Precomputed score for this submission.
    pub points: u64,
    /// Wallet address the submission is tied to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_address: Option<String>,
}

impl Submission {
    /// Returns the trimmed, non-empty category labels.
    pub fn categories(&self) -> Vec<&str> {
        self.category_tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

/// One participant's merged, totaled and (eventually) ranked row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedEntry {
    /// Grouping key, unique within one aggregation result.
    pub canonical_key: String,
    /// Display name of the first submission seen for the key.
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_handle: Option<String>,
    /// Address of the first submission seen for the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_address: Option<String>,
    /// Exact sum of the members' points.
    pub total_points: u64,
    /// Member submissions in input order.
    pub members: Vec<Submission>,
    /// 1-based position in the full leaderboard; `None` until ranked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
}

impl AggregatedEntry {
    /// Seeds a new entry from its first submission.
    pub fn seed(canonical_key: String, resolved_handle: Option<String>, first: Submission) -> Self {
        Self {
            canonical_key,
            display_name: first.display_name.clone(),
            resolved_handle,
            identity_address: first.identity_address.clone(),
            total_points: first.points,
            members: vec![first],
            rank: None,
        }
    }

    /// Folds another submission into this entry.
    ///
    /// Returns `false` and leaves the entry untouched when the new total
    /// would not fit in a `u64`.
    #[must_use]
    pub fn absorb(&mut self, submission: Submission) -> bool {
        match self.total_points.checked_add(submission.points) {
            Some(total) => {
                self.total_points = total;
                self.members.push(submission);
                true
            }
            None => false,
        }
    }

    /// True for the bucket collecting submissions with no usable identity.
    pub fn is_unresolved_bucket(&self) -> bool {
        self.canonical_key.is_empty()
    }

    /// Medal tier for podium positions.
    pub fn medal(&self) -> Option<MedalTier> {
        self.rank.and_then(MedalTier::for_rank)
    }
}

/// Podium tier for the top three ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedalTier {
    Gold,
    Silver,
    Bronze,
}

impl MedalTier {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(MedalTier::Gold),
            2 => Some(MedalTier::Silver),
            3 => Some(MedalTier::Bronze),
            _ => None,
        }
    }

    /// Returns an emoji representation of the tier.
    pub fn emoji(&self) -> &'static str {
        match self {
            MedalTier::Gold => "🏆",
            MedalTier::Silver => "🥈",
            MedalTier::Bronze => "🥉",
        }
    }
}

/// How the caller's standing was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfMatch {
    /// Entry address equals the caller's address.
    Address,
    /// Entry handle or name equals the caller's handle.
    Handle,
    /// Entry name contains the caller's handle.
    NameContains,
    /// Raw by-address sum placed against the ranked totals.
    AddressFallback,
}

impl fmt::Display for SelfMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelfMatch::Address => write!(f, "address"),
            SelfMatch::Handle => write!(f, "handle"),
            SelfMatch::NameContains => write!(f, "name"),
            SelfMatch::AddressFallback => write!(f, "address (estimated)"),
        }
    }
}

/// The caller's rank and total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfStanding {
    pub rank: usize,
    pub total_points: u64,
    pub matched_by: SelfMatch,
}

/// Grouping strategy used to build the entries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Resolved social handle, falling back to the display name (default)
    #[default]
    Handle,
    /// Wallet address
    Address,
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupBy::Handle => write!(f, "handle"),
            GroupBy::Address => write!(f, "address"),
        }
    }
}

/// Metadata about a rendered leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the submissions came from.
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub group_by: GroupBy,
    /// Records received from the source, valid or not.
    pub submissions_received: usize,
    /// Records skipped during decoding.
    pub submissions_rejected: usize,
    /// Entries in the full leaderboard.
    pub participants: usize,
    /// Sum of all points on the board.
    pub total_points: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// A leaderboard view ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Entries to display, ranks as in the full leaderboard.
    pub entries: Vec<AggregatedEntry>,
    /// The caller's standing, if an identity was given and found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub me: Option<SelfStanding>,
    /// Address of the caller, used to flag their row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_address: Option<String>,
    /// Handle the caller identified with, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_handle: Option<String>,
}

impl Report {
    /// Whether the caller supplied any identity to look up.
    pub fn has_caller_identity(&self) -> bool {
        self.caller_address.is_some() || self.caller_handle.is_some()
    }

    /// Whether the given entry belongs to the caller.
    pub fn is_caller(&self, entry: &AggregatedEntry) -> bool {
        if let (Some(me), Some(rank)) = (self.me, entry.rank) {
            if me.matched_by != SelfMatch::AddressFallback {
                return me.rank == rank;
            }
        }
        match (&self.caller_address, &entry.identity_address) {
            (Some(caller), Some(addr)) => caller == addr,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, points: u64) -> Submission {
        Submission {
            display_name: name.to_string(),
            handle: None,
            url: String::new(),
            category_tags: String::new(),
            points,
            identity_address: Some("A1".to_string()),
        }
    }

    #[test]
    fn test_categories_skip_empty_segments() {
        let mut s = submission("alice", 1);
        s.category_tags = "game, ,tooling,,  defi ".to_string();
        assert_eq!(s.categories(), vec!["game", "tooling", "defi"]);

        s.category_tags = String::new();
        assert!(s.categories().is_empty());
    }

    #[test]
    fn test_entry_seed_and_absorb() {
        let mut entry = AggregatedEntry::seed("alice".to_string(), None, submission("alice", 10));
        assert!(entry.absorb(submission("Alice B", 5)));

        assert_eq!(entry.total_points, 15);
        assert_eq!(entry.members.len(), 2);
        assert_eq!(entry.display_name, "alice");
        assert_eq!(entry.identity_address.as_deref(), Some("A1"));
        assert_eq!(entry.rank, None);
        assert!(!entry.is_unresolved_bucket());
    }

    #[test]
    fn test_absorb_refuses_overflowing_total() {
        let mut entry =
            AggregatedEntry::seed("alice".to_string(), None, submission("alice", u64::MAX / 2 + 1));

        assert!(!entry.absorb(submission("alice", u64::MAX / 2 + 1)));
        assert_eq!(entry.total_points, u64::MAX / 2 + 1);
        assert_eq!(entry.members.len(), 1);

        assert!(entry.absorb(submission("alice", u64::MAX / 2)));
        assert_eq!(entry.total_points, u64::MAX);
    }

    #[test]
    fn test_medal_tiers() {
        assert_eq!(MedalTier::for_rank(1), Some(MedalTier::Gold));
        assert_eq!(MedalTier::for_rank(2), Some(MedalTier::Silver));
        assert_eq!(MedalTier::for_rank(3), Some(MedalTier::Bronze));
        assert_eq!(MedalTier::for_rank(4), None);
        assert_eq!(MedalTier::Gold.emoji(), "🏆");
    }

    #[test]
    fn test_report_flags_caller_row() {
        let mut entry = AggregatedEntry::seed("alice".to_string(), None, submission("alice", 10));
        entry.rank = Some(1);

        let report = Report {
            metadata: ReportMetadata {
                source: "test".to_string(),
                generated_at: Utc::now(),
                group_by: GroupBy::Handle,
                submissions_received: 1,
                submissions_rejected: 0,
                participants: 1,
                total_points: 10,
                query: None,
            },
            entries: vec![entry.clone()],
            me: None,
            caller_address: Some("A1".to_string()),
            caller_handle: None,
        };
        assert!(report.is_caller(&entry));
        assert!(report.has_caller_identity());

        let other = Report {
            caller_address: Some("B2".to_string()),
            ..report
        };
        assert!(!other.is_caller(&entry));

        let anonymous = Report {
            caller_address: None,
            ..other.clone()
        };
        assert!(!anonymous.has_caller_identity());
        let by_handle = Report {
            caller_handle: Some("@alice".to_string()),
            ..anonymous
        };
        assert!(by_handle.has_caller_identity());
    }
}
