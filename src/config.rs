//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.buildboard.toml` files.

use crate::cli::OutputFormat;
use crate::models::GroupBy;
use crate::source::{ComputeUnitConfig, SubmissionSource};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".buildboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Submission source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Leaderboard display settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Write the leaderboard here instead of stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Where submissions are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Compute unit base URL.
    #[serde(default = "default_cu_url")]
    pub cu_url: String,

    /// Points process ID.
    #[serde(default = "default_process_id")]
    pub process_id: String,

    /// Action tag sent with the dry run.
    #[serde(default = "default_action")]
    pub action: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Read submissions from this JSON file instead of the process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_file: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            cu_url: default_cu_url(),
            process_id: default_process_id(),
            action: default_action(),
            timeout_seconds: default_timeout(),
            input_file: None,
        }
    }
}

fn default_cu_url() -> String {
    "https://cu.arnode.asia".to_string()
}

fn default_process_id() -> String {
    "EBVZfm0hBV0x30LeWotmEAIKs4XgOT6HgfFeMb1JGlU".to_string()
}

fn default_action() -> String {
    "Get-Points".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Leaderboard display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Grouping strategy for entries.
    #[serde(default)]
    pub group_by: GroupBy,

    /// List each entry's individual submissions.
    #[serde(default)]
    pub show_members: bool,

    /// Leading address characters kept when truncating.
    #[serde(default = "default_address_prefix")]
    pub address_prefix: usize,

    /// Trailing address characters kept when truncating.
    #[serde(default = "default_address_suffix")]
    pub address_suffix: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            group_by: GroupBy::default(),
            show_members: false,
            address_prefix: default_address_prefix(),
            address_suffix: default_address_suffix(),
        }
    }
}

fn default_address_prefix() -> usize {
    6
}

fn default_address_suffix() -> usize {
    4
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.buildboard.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = Some(output.clone());
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(ref cu_url) = args.cu_url {
            self.source.cu_url = cu_url.clone();
        }
        if let Some(ref process_id) = args.process_id {
            self.source.process_id = process_id.clone();
        }
        if let Some(ref action) = args.action {
            self.source.action = action.clone();
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }
        if let Some(ref input) = args.input {
            self.source.input_file = Some(input.clone());
        }

        if let Some(group_by) = args.group_by {
            self.display.group_by = group_by;
        }
        if args.members {
            self.display.show_members = true;
        }
    }

    /// The submission source these settings describe.
    pub fn submission_source(&self) -> SubmissionSource {
        match self.source.input_file {
            Some(ref path) => SubmissionSource::File(path.clone()),
            None => SubmissionSource::ComputeUnit(ComputeUnitConfig {
                cu_url: self.source.cu_url.clone(),
                process_id: self.source.process_id.clone(),
                action: self.source.action.clone(),
                timeout_seconds: self.source.timeout_seconds,
            }),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
