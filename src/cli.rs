//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::GroupBy;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// BuildBoard - points leaderboard for community build contests
///
/// Fetches scored submissions from the contest's points process, groups
/// them by participant, and prints a ranked, searchable leaderboard.
///
/// Examples:
///   buildboard
///   buildboard --search alice
///   buildboard --address <WALLET> --handle @me
///   buildboard --input points.json --format markdown -o board.md
///   buildboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Read submissions from a local JSON file instead of the process
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Compute unit URL used for the dry run
    #[arg(long, value_name = "URL", env = "BUILDBOARD_CU_URL")]
    pub cu_url: Option<String>,

    /// Points process ID
    #[arg(long, value_name = "ID", env = "BUILDBOARD_PROCESS_ID")]
    pub process_id: Option<String>,

    /// Action tag sent to the process
    #[arg(long, value_name = "NAME")]
    pub action: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Only show entries whose name, handle or address contains QUERY
    ///
    /// Case-insensitive. Ranks stay those of the full leaderboard.
    #[arg(short, long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Your wallet address, used to find your rank
    #[arg(long, value_name = "ADDR", env = "BUILDBOARD_ADDRESS")]
    pub address: Option<String>,

    /// Your social handle, used to find your rank
    #[arg(long, value_name = "HANDLE")]
    pub handle: Option<String>,

    /// Group submissions by resolved handle or by wallet address
    #[arg(long, value_name = "KEY")]
    pub group_by: Option<GroupBy>,

    /// List each participant's individual submissions
    #[arg(long)]
    pub members: bool,

    /// Output format (text, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the leaderboard to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .buildboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 2 if your identity can't be placed on the leaderboard
    #[arg(long)]
    pub require_self: bool,

    /// Generate a default .buildboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the leaderboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Terminal table (default)
    #[default]
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref cu_url) = self.cu_url {
            if !cu_url.starts_with("http://") && !cu_url.starts_with("https://") {
                return Err("Compute unit URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(ref process_id) = self.process_id {
            if process_id.trim().is_empty() {
                return Err("Process ID must not be empty".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.require_self && self.address.is_none() && self.handle.is_none() {
            return Err("--require-self needs --address or --handle".to_string());
        }

        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
            if !input.is_file() {
                return Err(format!("Input path is not a file: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The caller's address, ignoring blank values.
    pub fn caller_address(&self) -> Option<&str> {
        self.address.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }

    /// The caller's handle, ignoring blank values.
    pub fn caller_handle(&self) -> Option<&str> {
        self.handle.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }
}
