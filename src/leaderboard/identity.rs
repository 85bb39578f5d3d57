//! Participant identity resolution.
//!
//! Derives the handle a submission belongs to and the key used to
//! merge submissions into one leaderboard entry.

use crate::models::Submission;
use regex::Regex;
use std::sync::OnceLock;

/// Matches the account segment right after a twitter.com/ or x.com/ profile prefix.
fn profile_handle_regex() -> &'static Regex {
    static PROFILE_HANDLE: OnceLock<Regex> = OnceLock::new();
    PROFILE_HANDLE.get_or_init(|| {
        Regex::new(r"(?:twitter\.com|x\.com)/([A-Za-z0-9_]+)").expect("static regex is valid")
    })
}

/// Resolve the canonical `@handle` for a submission's name and handle fields.
///
/// An explicit handle wins, then an `@`-prefixed display name, then a handle
/// embedded in a twitter.com / x.com profile URL. Returns `None` when no
/// handle can be derived.
pub fn resolve_handle(display_name: &str, handle: Option<&str>) -> Option<String> {
    if let Some(handle) = handle {
        return Some(if handle.starts_with('@') {
            handle.to_string()
        } else {
            format!("@{}", handle)
        });
    }

    if display_name.starts_with('@') {
        return Some(display_name.to_string());
    }

    if display_name.contains("twitter.com/") || display_name.contains("x.com/") {
        if let Some(caps) = profile_handle_regex().captures(display_name) {
            return Some(format!("@{}", &caps[1]));
        }
    }

    None
}

/// Grouping key: the resolved handle, or the raw display name verbatim.
///
/// Matching is case-sensitive and untrimmed.
pub fn canonical_key(display_name: &str, resolved: Option<&str>) -> String {
    match resolved {
        Some(handle) => handle.to_string(),
        None => display_name.to_string(),
    }
}

/// Resolve both the handle and the grouping key of a submission.
pub fn identify(submission: &Submission) -> (String, Option<String>) {
    let resolved = resolve_handle(&submission.display_name, submission.handle.as_deref());
    let key = canonical_key(&submission.display_name, resolved.as_deref());
    (key, resolved)
}
