//! Leaderboard report generation.
//!
//! This module turns a ranked leaderboard into a terminal table, a
//! Markdown document or JSON.

use crate::config::DisplayConfig;
use crate::leaderboard::{Leaderboard, SearchSummary};
use crate::models::{AggregatedEntry, Report, ReportMetadata, SelfStanding, Submission};
use anyhow::Result;
use chrono::Utc;

/// Rendering options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub show_members: bool,
    pub address_prefix: usize,
    pub address_suffix: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for RenderOptions {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            show_members: config.show_members,
            address_prefix: config.address_prefix,
            address_suffix: config.address_suffix,
        }
    }
}

/// Assemble the report for a leaderboard view.
pub fn assemble_report(
    board: &Leaderboard,
    source: String,
    submissions_rejected: usize,
    query: Option<&str>,
    me: Option<SelfStanding>,
    caller_address: Option<&str>,
    caller_handle: Option<&str>,
) -> Report {
    let entries: Vec<AggregatedEntry> = board
        .search(query.unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();

    let metadata = ReportMetadata {
        source,
        generated_at: Utc::now(),
        group_by: board.group_by(),
        submissions_received: board.submissions().len() + submissions_rejected,
        submissions_rejected,
        participants: board.entries().len(),
        total_points: board.total_points(),
        query: query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(String::from),
    };

    Report {
        metadata,
        entries,
        me,
        caller_address: caller_address.map(String::from),
        caller_handle: caller_handle.map(String::from),
    }
}

/// Shorten an address to `prefix...suffix`.
///
/// Addresses too short to benefit are returned unchanged.
pub fn truncate_address(address: &str, prefix: usize, suffix: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= prefix + suffix + 3 {
        return address.to_string();
    }

    let head: String = chars[..prefix].iter().collect();
    let tail: String = chars[chars.len() - suffix..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Rank badge: a medal for the podium, `#n` otherwise.
fn rank_badge(entry: &AggregatedEntry) -> String {
    match (entry.medal(), entry.rank) {
        (Some(medal), _) => medal.emoji().to_string(),
        (None, Some(rank)) => format!("#{}", rank),
        (None, None) => "-".to_string(),
    }
}

fn display_name(entry: &AggregatedEntry) -> &str {
    if entry.display_name.is_empty() {
        "(unnamed)"
    } else {
        entry.display_name.as_str()
    }
}

fn short_address(entry: &AggregatedEntry, options: &RenderOptions) -> String {
    entry
        .identity_address
        .as_deref()
        .map(|a| truncate_address(a, options.address_prefix, options.address_suffix))
        .unwrap_or_default()
}

fn entries_label(count: usize) -> String {
    format!("{} entr{}", count, if count == 1 { "y" } else { "ies" })
}

/// Caller line shown above the table.
fn standing_line(me: Option<&SelfStanding>, has_identity: bool) -> Option<String> {
    match me {
        Some(me) => Some(format!(
            "Your rank: #{} with {} points (matched by {})",
            me.rank, me.total_points, me.matched_by
        )),
        None if has_identity => Some("You are not on the leaderboard yet.".to_string()),
        None => None,
    }
}

/// Generate a plain-text leaderboard for the terminal.
pub fn generate_text_report(report: &Report, options: &RenderOptions) -> String {
    let mut output = String::new();

    output.push_str("BuildStations Scoreboard\n");
    output.push_str(&format!(
        "{} participants, {} points, {} submissions",
        report.metadata.participants,
        report.metadata.total_points,
        report.metadata.submissions_received
    ));
    if report.metadata.submissions_rejected > 0 {
        output.push_str(&format!(
            " ({} skipped)",
            report.metadata.submissions_rejected
        ));
    }
    output.push_str("\n\n");

    if let Some(line) = standing_line(report.me.as_ref(), report.has_caller_identity()) {
        output.push_str(&line);
        output.push_str("\n\n");
    }

    let summary = SearchSummary::new(report.metadata.query.as_deref(), report.entries.len());
    if let Some(message) = summary.message() {
        output.push_str(&message);
        output.push_str("\n\n");
    }

    let name_width = report
        .entries
        .iter()
        .map(|e| display_name(e).chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    for entry in &report.entries {
        let you = if report.is_caller(entry) { "  <- You" } else { "" };
        output.push_str(&format!(
            "{:>4}  {:<width$}  {:<13}  {:>6} pts  {}{}\n",
            rank_badge(entry),
            display_name(entry),
            short_address(entry, options),
            entry.total_points,
            entries_label(entry.members.len()),
            you,
            width = name_width
        ));

        if options.show_members {
            for (i, member) in entry.members.iter().enumerate() {
                output.push_str(&format!(
                    "        {}. {:>6} pts  {}\n",
                    i + 1,
                    member.points,
                    member_link(member)
                ));
            }
        }
    }

    output
}

fn member_link(member: &Submission) -> &str {
    if member.url.is_empty() {
        "No URL provided"
    } else {
        member.url.as_str()
    }
}

/// Generate a complete Markdown leaderboard.
pub fn generate_markdown_report(report: &Report, options: &RenderOptions) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# BuildStations Scoreboard\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    if let Some(line) = standing_line(report.me.as_ref(), report.has_caller_identity()) {
        output.push_str(&format!("> {}\n\n", line));
    }

    // Leaderboard table
    output.push_str(&generate_table_section(report, options));

    // Per-participant submissions
    if options.show_members {
        output.push_str(&generate_members_section(&report.entries));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Grouped By:** {}\n", metadata.group_by));
    section.push_str(&format!(
        "- **Submissions:** {}\n",
        metadata.submissions_received
    ));
    if metadata.submissions_rejected > 0 {
        section.push_str(&format!(
            "- **Skipped (malformed):** {}\n",
            metadata.submissions_rejected
        ));
    }
    section.push_str(&format!("- **Participants:** {}\n", metadata.participants));
    section.push_str(&format!("- **Total Points:** {}\n", metadata.total_points));
    section.push('\n');

    section
}

/// Generate the ranked table.
fn generate_table_section(report: &Report, options: &RenderOptions) -> String {
    let mut section = String::new();

    section.push_str("## Leaderboard\n\n");

    let summary = SearchSummary::new(report.metadata.query.as_deref(), report.entries.len());
    if let Some(message) = summary.message() {
        section.push_str(&format!("*{}*\n\n", message));
    }
    if report.entries.is_empty() {
        return section;
    }

    section.push_str("| Rank | Participant | Address | Points | Entries |\n");
    section.push_str("|:---:|:---|:---|---:|:---:|\n");

    for entry in &report.entries {
        let mut name = escape_cell(display_name(entry));
        if let Some(ref handle) = entry.resolved_handle {
            if handle != &entry.display_name {
                name.push_str(&format!(" ({})", escape_cell(handle)));
            }
        }
        if report.is_caller(entry) {
            name.push_str(" **(You)**");
        }

        let address = short_address(entry, options);
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            rank_badge(entry),
            name,
            if address.is_empty() {
                String::new()
            } else {
                format!("`{}`", address)
            },
            entry.total_points,
            entry.members.len()
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-participant submission listing.
fn generate_members_section(entries: &[AggregatedEntry]) -> String {
    let mut section = String::new();

    section.push_str("## Submissions\n\n");

    for entry in entries {
        section.push_str(&format!(
            "### {} {} - {} points\n\n",
            rank_badge(entry),
            escape_cell(display_name(entry)),
            entry.total_points
        ));
        if let Some(ref address) = entry.identity_address {
            section.push_str(&format!("**Address:** `{}`\n\n", address));
        }

        for (i, member) in entry.members.iter().enumerate() {
            let link = if member.url.is_empty() {
                "No URL provided".to_string()
            } else {
                format!("[View Link]({})", member.url)
            };
            section.push_str(&format!(
                "{}. {} - **{} pts**",
                i + 1,
                link,
                member.points
            ));
            let categories = member.categories();
            if !categories.is_empty() {
                section.push_str(&format!(" _({})_", categories.join(", ")));
            }
            section.push('\n');
        }
        section.push('\n');
    }

    section
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Generated by buildboard*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
