//! CLI output formatting utilities.

use crate::alignment::{AlignmentEntry, AlignmentResult, MatchStatus};
use crate::transcript::format_timestamp;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one alignment entry.
    pub fn entry(entry: &AlignmentEntry) {
        let status = match entry.status {
            MatchStatus::Matched => style("matched").green(),
            MatchStatus::Approximate => style("approx").yellow(),
            MatchStatus::Unmatched => style("unmatched").red(),
        };
        let range = match (entry.trimmed_start, entry.trimmed_end) {
            (Some(start), Some(end)) => format!("{} - {}", format_timestamp(start), format_timestamp(end)),
            _ => "-".to_string(),
        };

        println!(
            "  {:>4} {:<9} {:.3} {} {}",
            style(entry.script_index + 1).dim(),
            status,
            entry.confidence,
            style(format!("{:<23}", range)).cyan(),
            content_preview(&entry.script_line, 80)
        );
    }

    /// Print a full alignment report with stats.
    pub fn alignment_report(result: &AlignmentResult) {
        Output::header("Alignment");
        for entry in &result.entries {
            Output::entry(entry);
        }

        let stats = &result.stats;
        Output::header("Summary");
        Output::kv("Lines", &stats.total_lines.to_string());
        Output::kv("Matched", &stats.matched.to_string());
        Output::kv("Approximate", &stats.approximate.to_string());
        Output::kv("Unmatched", &stats.unmatched.to_string());
        Output::kv("Avg confidence", &format!("{:.3}", stats.avg_confidence));
        if !result.unused_segments.is_empty() {
            Output::kv("Unused segments", &format!("{:?}", result.unused_segments));
        }
    }

    /// Create a progress bar.
    pub fn progress_bar(len: u64, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(msg.to_string());
        pb
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
