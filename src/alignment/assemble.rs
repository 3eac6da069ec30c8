//! Turn traced assignments into the public alignment result.

use super::dp::Assignment;
use super::normalize::ScriptLine;
use super::table::window_text;
use super::trim::trim_to_words;
use super::{AlignmentEntry, AlignmentResult, AlignmentStats, MatchStatus};
use crate::transcript::TranscriptSegment;

/// Round to three decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Build entries, unused segments and stats.
///
/// `assignments` must hold exactly one entry per script line, in script order.
pub fn assemble(
    lines: &[ScriptLine],
    segments: &[TranscriptSegment],
    assignments: &[Assignment],
    approximate_threshold: f64,
    matched_threshold: f64,
) -> AlignmentResult {
    let mut claimed = vec![false; segments.len()];
    let mut entries = Vec::with_capacity(lines.len());

    for (line, assignment) in lines.iter().zip(assignments) {
        let Some(window) = assignment.window.clone() else {
            entries.push(AlignmentEntry::unmatched(line));
            continue;
        };

        for flag in &mut claimed[window.clone()] {
            *flag = true;
        }

        let matched = &segments[window.clone()];
        let (trimmed_start, trimmed_end) = match trim_to_words(&line.tokens, matched) {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };
        let confidence = round3(assignment.score);

        entries.push(AlignmentEntry {
            script_index: line.index,
            script_line: line.text.clone(),
            matched_segments: window.collect(),
            matched_text: window_text(matched),
            trimmed_start,
            trimmed_end,
            confidence,
            status: MatchStatus::classify(confidence, approximate_threshold, matched_threshold),
        });
    }

    let unused_segments = claimed
        .iter()
        .enumerate()
        .filter(|(_, used)| !**used)
        .map(|(idx, _)| idx)
        .collect();

    let stats = AlignmentStats::from_entries(&entries);

    AlignmentResult {
        entries,
        unused_segments,
        stats,
    }
}

impl AlignmentEntry {
    fn unmatched(line: &ScriptLine) -> Self {
        Self {
            script_index: line.index,
            script_line: line.text.clone(),
            matched_segments: Vec::new(),
            matched_text: String::new(),
            trimmed_start: None,
            trimmed_end: None,
            confidence: 0.0,
            status: MatchStatus::Unmatched,
        }
    }
}

impl AlignmentStats {
    /// Per-status counts and mean confidence over entries with confidence above zero.
    pub fn from_entries(entries: &[AlignmentEntry]) -> Self {
        let count = |status: MatchStatus| entries.iter().filter(|e| e.status == status).count();

        let scored: Vec<f64> = entries
            .iter()
            .map(|e| e.confidence)
            .filter(|c| *c > 0.0)
            .collect();
        let avg_confidence = if scored.is_empty() {
            0.0
        } else {
            round3(scored.iter().sum::<f64>() / scored.len() as f64)
        };

        Self {
            total_lines: entries.len(),
            matched: count(MatchStatus::Matched),
            approximate: count(MatchStatus::Approximate),
            unmatched: count(MatchStatus::Unmatched),
            avg_confidence,
        }
    }
}
