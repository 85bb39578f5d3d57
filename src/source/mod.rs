//! Submission sources.
//!
//! Submissions come either from the points process on a compute unit or
//! from a local JSON file with the same record layout. Either way the raw
//! records go through [`decode::decode_records`] before use.

pub mod ao;
pub mod decode;

pub use ao::{ComputeUnitClient, ComputeUnitConfig};
pub use decode::{decode_records, DecodeOutcome};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Where to read submissions from.
#[derive(Debug, Clone)]
pub enum SubmissionSource {
    /// Dry-run the points process on a compute unit.
    ComputeUnit(ComputeUnitConfig),
    /// Read a JSON array from disk.
    File(PathBuf),
}

impl SubmissionSource {
    /// Short description for logs and report metadata.
    pub fn describe(&self) -> String {
        match self {
            SubmissionSource::ComputeUnit(config) => {
                format!("process {} via {}", config.process_id, config.cu_url)
            }
            SubmissionSource::File(path) => format!("file {}", path.display()),
        }
    }

    /// Fetch and decode all submissions.
    pub async fn load(&self, show_progress: bool) -> Result<DecodeOutcome> {
        let records = match self {
            SubmissionSource::ComputeUnit(config) => {
                let client = ComputeUnitClient::new(config.clone())?;
                let spinner = show_progress.then(fetch_spinner);

                let result = client.fetch_records().await;

                if let Some(pb) = spinner {
                    pb.finish_and_clear();
                }
                result?
            }
            SubmissionSource::File(path) => load_from_file(path).await?,
        };

        let outcome = decode_records(&records)?;
        for rejected in &outcome.rejected {
            warn!("Skipping submission #{}: {}", rejected.index, rejected.reason);
        }
        info!(
            "Loaded {} of {} submissions from {}",
            outcome.submissions.len(),
            outcome.received(),
            self.describe()
        );

        Ok(outcome)
    }
}

/// Read a record array from a JSON file.
pub async fn load_from_file(path: &Path) -> Result<Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read submissions file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse submissions file: {}", path.display()))
}

fn fetch_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Fetching leaderboard data...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
