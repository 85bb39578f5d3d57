//! Record validation at the input boundary.
//!
//! The points process returns loosely typed JSON. Each record is checked
//! once here and turned into a [`Submission`]; records that fail are
//! skipped with a reason so one bad row cannot void the leaderboard.

use crate::models::Submission;
use anyhow::{bail, Result};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

const NAME_FIELDS: &[&str] = &["username", "displayName", "display_name", "name"];
const HANDLE_FIELDS: &[&str] = &["handle", "twitter"];
const CATEGORY_FIELDS: &[&str] = &["categories", "categoryTags", "category_tags"];
const ADDRESS_FIELDS: &[&str] = &["address", "identityAddress", "identity_address"];

/// Largest per-submission score accepted (2^53 - 1, the largest integer
/// the points process can hand over exactly).
pub const MAX_POINTS: u64 = 9_007_199_254_740_991;

/// Why a single record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` must be a string")]
    InvalidField { field: String },
    #[error("points must be a non-negative integer, got {0}")]
    InvalidPoints(String),
}

/// A record that was skipped, with its position in the source array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub index: usize,
    pub reason: RecordError,
}

/// Result of decoding a batch of records.
#[derive(Debug, Clone, Default)]
pub struct DecodeOutcome {
    pub submissions: Vec<Submission>,
    pub rejected: Vec<Rejected>,
}

impl DecodeOutcome {
    /// Total records seen, valid or not.
    pub fn received(&self) -> usize {
        self.submissions.len() + self.rejected.len()
    }
}

/// Decode a JSON array of records into submissions.
///
/// Fails only if `value` is not an array; bad records are collected in
/// [`DecodeOutcome::rejected`].
pub fn decode_records(value: &Value) -> Result<DecodeOutcome> {
    let Some(records) = value.as_array() else {
        bail!("Expected a JSON array of submissions, got {}", kind_of(value));
    };

    let mut outcome = DecodeOutcome::default();

    for (index, record) in records.iter().enumerate() {
        match decode_record(record) {
            Ok(submission) => outcome.submissions.push(submission),
            Err(reason) => outcome.rejected.push(Rejected { index, reason }),
        }
    }

    debug!(
        "Decoded {} submissions ({} rejected)",
        outcome.submissions.len(),
        outcome.rejected.len()
    );

    Ok(outcome)
}

/// Decode a single record.
pub fn decode_record(record: &Value) -> Result<Submission, RecordError> {
    let object = record.as_object().ok_or(RecordError::NotAnObject)?;

    let display_name =
        string_field(object, NAME_FIELDS)?.ok_or(RecordError::MissingField("username"))?;
    let points = points_field(object)?;

    Ok(Submission {
        display_name,
        handle: non_blank(string_field(object, HANDLE_FIELDS)?),
        url: string_field(object, &["url"])?.unwrap_or_default(),
        category_tags: string_field(object, CATEGORY_FIELDS)?.unwrap_or_default(),
        points,
        identity_address: non_blank(string_field(object, ADDRESS_FIELDS)?),
    })
}

/// First present, non-null alias of a string field.
fn string_field(object: &Map<String, Value>, aliases: &[&str]) -> Result<Option<String>, RecordError> {
    for alias in aliases {
        match object.get(*alias) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(_) => {
                return Err(RecordError::InvalidField {
                    field: alias.to_string(),
                })
            }
        }
    }
    Ok(None)
}

fn points_field(object: &Map<String, Value>) -> Result<u64, RecordError> {
    let points = raw_points(object)?;
    if points > MAX_POINTS {
        return Err(RecordError::InvalidPoints(format!(
            "{} (above the {} limit)",
            points, MAX_POINTS
        )));
    }
    Ok(points)
}

fn raw_points(object: &Map<String, Value>) -> Result<u64, RecordError> {
    match object.get("points") {
        None | Some(Value::Null) => Err(RecordError::MissingField("points")),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| RecordError::InvalidPoints(n.to_string())),
        Some(Value::String(s)) => {
            let digits = s.trim();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(RecordError::InvalidPoints(format!("{:?}", s)));
            }
            digits
                .parse::<u64>()
                .map_err(|_| RecordError::InvalidPoints(format!("{:?}", s)))
        }
        Some(other) => Err(RecordError::InvalidPoints(kind_of(other).to_string())),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
