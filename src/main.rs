//! BuildBoard - points leaderboard for community build contests
//!
//! A CLI tool that reads scored submissions from the contest's points
//! process, groups them by participant, and prints a ranked, searchable
//! leaderboard together with the caller's own standing.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, config, fetch failure, etc.)
//!   2 - --require-self was given and the caller could not be placed

mod cli;
mod config;
mod leaderboard;
mod models;
mod report;
mod source;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use leaderboard::Leaderboard;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("BuildBoard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_leaderboard(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Leaderboard failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .buildboard.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the process, compute unit, and display options.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Fetch, rank and render the leaderboard. Returns the exit code (0 or 2).
async fn run_leaderboard(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Fetch and validate submissions
    let source = config.submission_source();
    info!("Reading submissions from {}", source.describe());
    let outcome = source.load(!args.quiet).await?;
    let rejected = outcome.rejected.len();

    // Step 2: Aggregate and rank (full recomputation from the snapshot)
    let board = Leaderboard::build(outcome.submissions, config.display.group_by);

    // Step 3: Locate the caller
    let caller_address = args.caller_address();
    let me = board.find_self(caller_address, args.caller_handle());
    match me {
        Some(me) => info!(
            "Caller is ranked #{} with {} points (matched by {})",
            me.rank, me.total_points, me.matched_by
        ),
        None if caller_address.is_some() || args.caller_handle().is_some() => {
            warn!("Caller identity not found on the leaderboard")
        }
        None => {}
    }

    // Step 4: Build and render the view
    let report = report::assemble_report(
        &board,
        source.describe(),
        rejected,
        args.search.as_deref(),
        me,
        caller_address,
        args.caller_handle(),
    );
    let options = report::RenderOptions::from(&config.display);

    let output = match config.general.format {
        OutputFormat::Text => report::generate_text_report(&report, &options),
        OutputFormat::Markdown => report::generate_markdown_report(&report, &options),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write leaderboard to {}", path.display()))?;
            if !args.quiet {
                println!("✅ Leaderboard saved to: {}", path.display());
            }
        }
        None => print!("{}", output),
    }

    if args.require_self && me.is_none() {
        eprintln!("\n⛔ Your identity was not found on the leaderboard (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
