//! Alignment output formatting (JSON, SRT, VTT, plain text).
//!
//! JSON is the machine-readable form consumed by downstream timeline tooling. SRT and
//! VTT turn the aligned script into subtitles using the trimmed times.

use crate::alignment::{AlignmentEntry, AlignmentResult};
use crate::transcript::format_timestamp;
use std::path::Path;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Srt,
    Vtt,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "srt" => Ok(OutputFormat::Srt),
            "vtt" | "webvtt" => Ok(OutputFormat::Vtt),
            "text" | "txt" => Ok(OutputFormat::Text),
            _ => Err(format!("Unknown format: {}. Use json, srt, vtt, or text.", s)),
        }
    }
}

impl OutputFormat {
    /// Guess the format from an output file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
            .unwrap_or(OutputFormat::Json)
    }
}

/// Format an alignment result for output.
pub fn format_result(result: &AlignmentResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(result),
        OutputFormat::Srt => format_srt(result),
        OutputFormat::Vtt => format_vtt(result),
        OutputFormat::Text => format_text(result),
    }
}

/// Format as JSON.
fn format_json(result: &AlignmentResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
}

/// Entries that carry a time range, with their range.
fn timed_entries(result: &AlignmentResult) -> impl Iterator<Item = (&AlignmentEntry, f64, f64)> {
    result.entries.iter().filter_map(|e| match (e.trimmed_start, e.trimmed_end) {
        (Some(start), Some(end)) => Some((e, start, end)),
        _ => None,
    })
}

/// Format as SRT (SubRip).
fn format_srt(result: &AlignmentResult) -> String {
    let mut output = String::new();

    for (i, (entry, start, end)) in timed_entries(result).enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(start),
            format_srt_timestamp(end)
        ));
        output.push_str(&entry.script_line);
        output.push_str("\n\n");
    }

    output
}

/// Format as WebVTT.
fn format_vtt(result: &AlignmentResult) -> String {
    let mut output = String::from("WEBVTT\n\n");

    for (i, (entry, start, end)) in timed_entries(result).enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_vtt_timestamp(start),
            format_vtt_timestamp(end)
        ));
        output.push_str(&entry.script_line);
        output.push_str("\n\n");
    }

    output
}

/// Format as a plain-text report, one line per script line.
fn format_text(result: &AlignmentResult) -> String {
    let mut output = String::new();

    for entry in &result.entries {
        let range = match (entry.trimmed_start, entry.trimmed_end) {
            (Some(start), Some(end)) => {
                format!("{} - {}", format_timestamp(start), format_timestamp(end))
            }
            _ => "-".to_string(),
        };
        output.push_str(&format!(
            "{:>4}  {:<11}  {:.3}  {:<23}  {}\n",
            entry.script_index + 1,
            entry.status.to_string(),
            entry.confidence,
            range,
            entry.script_line
        ));
    }

    let stats = &result.stats;
    output.push_str(&format!(
        "\n{} lines: {} matched, {} approximate, {} unmatched (avg confidence {:.3})\n",
        stats.total_lines, stats.matched, stats.approximate, stats.unmatched, stats.avg_confidence
    ));
    if !result.unused_segments.is_empty() {
        output.push_str(&format!("Unused segments: {:?}\n", result.unused_segments));
    }

    output
}

fn split_millis(seconds: f64) -> (u64, u64, u64, u64) {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    (
        total_ms / 3_600_000,
        (total_ms % 3_600_000) / 60_000,
        (total_ms % 60_000) / 1000,
        total_ms % 1000,
    )
}

/// Format timestamp for SRT (00:00:00,000).
fn format_srt_timestamp(seconds: f64) -> String {
    let (hours, minutes, secs, ms) = split_millis(seconds);
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, ms)
}

/// Format timestamp for VTT (00:00:00.000).
fn format_vtt_timestamp(seconds: f64) -> String {
    let (hours, minutes, secs, ms) = split_millis(seconds);
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::align;
    use crate::transcript::{Transcript, TranscriptSegment};

    fn sample_result() -> AlignmentResult {
        let transcript = Transcript::new(vec![
            TranscriptSegment::new(0, 0.0, 2.5, "Hello world."),
            TranscriptSegment::new(1, 2.5, 5.0, "This is a test."),
        ]);
        align("Hello world\nSomething unrelated entirely\nThis is a test", &transcript).unwrap()
    }

    #[test]
    fn test_format_json() {
        let json = format_result(&sample_result(), OutputFormat::Json);
        assert!(json.contains("\"status\": \"matched\""));
        assert!(json.contains("\"trimmed_start\": null"));

        let parsed: AlignmentResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample_result());
    }

    #[test]
    fn test_format_srt_skips_unmatched() {
        let srt = format_result(&sample_result(), OutputFormat::Srt);
        assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:02,500\nHello world\n\n"));
        assert!(srt.contains("2\n00:00:02,500 --> 00:00:05,000\nThis is a test"));
        assert!(!srt.contains("unrelated"));
    }

    #[test]
    fn test_format_vtt() {
        let vtt = format_result(&sample_result(), OutputFormat::Vtt);
        assert!(vtt.starts_with("WEBVTT"));
        assert!(vtt.contains("00:00:00.000 --> 00:00:02.500"));
    }

    #[test]
    fn test_format_text() {
        let text = format_result(&sample_result(), OutputFormat::Text);
        assert!(text.contains("matched"));
        assert!(text.contains("3 lines: 2 matched, 0 approximate, 1 unmatched"));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("SRT".parse::<OutputFormat>().unwrap(), OutputFormat::Srt);
        assert_eq!("webvtt".parse::<OutputFormat>().unwrap(), OutputFormat::Vtt);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("edl".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::from_path(Path::new("out.vtt")), OutputFormat::Vtt);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Json);
    }

    #[test]
    fn test_srt_timestamp() {
        assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(61.5), "00:01:01,500");
        assert_eq!(format_srt_timestamp(3661.123), "01:01:01,123");
    }
}
