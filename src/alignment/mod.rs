//! Script-to-transcript alignment engine.
//!
//! Aligns each line of a written script to at most one contiguous run of 1–3 transcript
//! segments, maximising total similarity while keeping script order and never reusing a
//! segment.
//!
//! # Pipeline
//!
//! 1. [`normalize`] splits the script into lines and tokenizes text.
//! 2. [`table`] scores every script line against every transcript window using
//!    the blended signals in [`similarity`].
//! 3. [`dp`] finds the globally optimal, order-preserving assignment.
//! 4. [`trim`] tightens matched windows with word-level timestamps.
//! 5. [`assemble`] classifies matches and computes stats.
//!
//! The engine is a pure function of its inputs: no I/O, no shared state, no randomness.
//!
//! # Example
//!
//! ```rust
//! use scriptsync::alignment::{align, MatchStatus};
//! use scriptsync::transcript::{Transcript, TranscriptSegment};
//!
//! let transcript = Transcript::new(vec![TranscriptSegment::new(0, 0.0, 1.0, "hello world")]);
//! let result = align("HELLO WORLD", &transcript).unwrap();
//!
//! assert_eq!(result.entries[0].status, MatchStatus::Matched);
//! assert_eq!(result.entries[0].matched_segments, vec![0]);
//! ```

pub mod assemble;
pub mod dp;
pub mod normalize;
pub mod similarity;
pub mod table;
pub mod trim;

pub use normalize::{normalize, script_lines, split_script_into_lines, tokenize, ScriptLine};
pub use similarity::{
    combined_score, jaccard, lcs_length, lcs_ratio, word_order_score, ScoreWeights,
};

use crate::error::{Result, SyncError};
use crate::transcript::Transcript;
use dp::SolverParams;
use serde::{Deserialize, Serialize};
use table::ScoreTable;
use tracing::{debug, info, instrument};

/// Maximum number of contiguous segments one script line may claim.
pub const MAX_SPAN: usize = 3;

/// Tuning constants for the aligner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentParams {
    /// Windows scoring below this are never matched.
    pub min_match_score: f64,
    /// Confidence at or above which a match is reported as approximate.
    pub approximate_threshold: f64,
    /// Confidence at or above which a match is reported as matched.
    pub matched_threshold: f64,
    /// Script lines longer than this many characters are split into sentences.
    pub max_line_chars: usize,
    /// Optional bound on how far ahead of the cursor a window may start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookahead: Option<usize>,
    /// Blend weights for the similarity signals.
    pub weights: ScoreWeights,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            min_match_score: 0.15,
            approximate_threshold: 0.3,
            matched_threshold: 0.7,
            max_line_chars: normalize::DEFAULT_MAX_LINE_CHARS,
            lookahead: None,
            weights: ScoreWeights::default(),
        }
    }
}

impl AlignmentParams {
    /// Reject parameter combinations that would break the result contract.
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(SyncError::Config(format!("{} must be within [0, 1], got {}", name, value)))
            }
        };

        unit("min_match_score", self.min_match_score)?;
        unit("approximate_threshold", self.approximate_threshold)?;
        unit("matched_threshold", self.matched_threshold)?;

        if self.approximate_threshold > self.matched_threshold {
            return Err(SyncError::Config(format!(
                "approximate_threshold ({}) exceeds matched_threshold ({})",
                self.approximate_threshold, self.matched_threshold
            )));
        }

        let w = &self.weights;
        if [w.jaccard, w.lcs, w.word_order].iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(SyncError::Config("score weights must be non-negative".to_string()));
        }
        if w.total() <= 0.0 || w.total() > 1.0 + 1e-9 {
            return Err(SyncError::Config(format!(
                "score weights must sum to a value in (0, 1], got {}",
                w.total()
            )));
        }

        if self.max_line_chars == 0 {
            return Err(SyncError::Config("max_line_chars must be at least 1".to_string()));
        }
        if self.lookahead == Some(0) {
            return Err(SyncError::Config("lookahead must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Per-line outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Matched,
    Approximate,
    Unmatched,
}

impl MatchStatus {
    /// Classify a confidence value. Independent of the DP acceptance floor.
    pub fn classify(confidence: f64, approximate_threshold: f64, matched_threshold: f64) -> Self {
        if confidence >= matched_threshold {
            MatchStatus::Matched
        } else if confidence >= approximate_threshold {
            MatchStatus::Approximate
        } else {
            MatchStatus::Unmatched
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Matched => write!(f, "matched"),
            MatchStatus::Approximate => write!(f, "approximate"),
            MatchStatus::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// Alignment of one script line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentEntry {
    pub script_index: usize,
    pub script_line: String,
    /// Indices into the transcript's segment list, contiguous and ascending.
    pub matched_segments: Vec<usize>,
    pub matched_text: String,
    pub trimmed_start: Option<f64>,
    pub trimmed_end: Option<f64>,
    /// Match score rounded to three decimals.
    pub confidence: f64,
    pub status: MatchStatus,
}

/// Aggregate counts over all entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub total_lines: usize,
    pub matched: usize,
    pub approximate: usize,
    pub unmatched: usize,
    pub avg_confidence: f64,
}

/// Result of aligning a script against a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// One entry per script line, in script order.
    pub entries: Vec<AlignmentEntry>,
    /// Segment indices not claimed by any entry.
    pub unused_segments: Vec<usize>,
    pub stats: AlignmentStats,
}

/// Script-to-transcript aligner with configurable tuning constants.
#[derive(Debug, Clone, Default)]
pub struct Aligner {
    params: AlignmentParams,
}

impl Aligner {
    /// Create an aligner, rejecting parameters that could push confidence outside [0, 1].
    pub fn new(params: AlignmentParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &AlignmentParams {
        &self.params
    }

    /// Align `script` against `transcript`.
    ///
    /// Fails with [`SyncError::InvalidInput`] for a blank script, an empty transcript, or a
    /// script with no usable lines.
    #[instrument(skip_all, fields(script_chars = script.len(), segments = transcript.segments.len()))]
    pub fn align(&self, script: &str, transcript: &Transcript) -> Result<AlignmentResult> {
        if script.trim().is_empty() {
            return Err(SyncError::InvalidInput("script text is empty".to_string()));
        }
        if transcript.segments.is_empty() {
            return Err(SyncError::InvalidInput("transcript has no segments".to_string()));
        }

        let lines = script_lines(script, self.params.max_line_chars);
        if lines.is_empty() {
            return Err(SyncError::InvalidInput(
                "script contains no alignable lines".to_string(),
            ));
        }

        info!(
            "Aligning {} script lines against {} segments",
            lines.len(),
            transcript.segments.len()
        );

        let table = ScoreTable::build(&lines, &transcript.segments, &self.params.weights);
        debug!(
            "Built score table ({} x {} x {})",
            table.line_count(),
            table.segment_count(),
            MAX_SPAN
        );

        let assignments = dp::solve(
            &table,
            &SolverParams {
                min_match_score: self.params.min_match_score,
                lookahead: self.params.lookahead,
            },
        )?;
        if assignments.len() != lines.len() {
            return Err(SyncError::Invariant(format!(
                "traceback produced {} assignments for {} lines",
                assignments.len(),
                lines.len()
            )));
        }

        let result = assemble::assemble(
            &lines,
            &transcript.segments,
            &assignments,
            self.params.approximate_threshold,
            self.params.matched_threshold,
        );

        debug!(
            "Alignment done: {} matched, {} approximate, {} unmatched, {} unused segments",
            result.stats.matched,
            result.stats.approximate,
            result.stats.unmatched,
            result.unused_segments.len()
        );

        Ok(result)
    }
}

/// Align with the default tuning constants.
pub fn align(script: &str, transcript: &Transcript) -> Result<AlignmentResult> {
    Aligner::default().align(script, transcript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{TranscriptSegment, Word};

    fn transcript(texts: &[&str]) -> Transcript {
        Transcript::new(
            texts
                .iter()
                .enumerate()
                .map(|(i, text)| TranscriptSegment::new(i as u64, i as f64 * 2.0, i as f64 * 2.0 + 2.0, *text))
                .collect(),
        )
    }

    fn assert_contract(result: &AlignmentResult, expected_lines: usize, params: &AlignmentParams) {
        assert_eq!(result.entries.len(), expected_lines);

        let mut last_end: Option<usize> = None;
        for (i, entry) in result.entries.iter().enumerate() {
            assert_eq!(entry.script_index, i);
            assert!((0.0..=1.0).contains(&entry.confidence));
            assert_eq!(
                entry.status,
                MatchStatus::classify(entry.confidence, params.approximate_threshold, params.matched_threshold)
            );

            if entry.matched_segments.is_empty() {
                continue;
            }
            assert!((1..=MAX_SPAN).contains(&entry.matched_segments.len()));
            for pair in entry.matched_segments.windows(2) {
                assert_eq!(pair[0] + 1, pair[1]);
            }
            if let Some(end) = last_end {
                assert!(entry.matched_segments[0] > end);
            }
            last_end = entry.matched_segments.last().copied();
        }
    }

    #[test]
    fn test_single_exact_line() {
        let transcript = Transcript::new(vec![TranscriptSegment::new(0, 0.0, 1.0, "hello world")]);
        let result = align("HELLO WORLD", &transcript).unwrap();

        let entry = &result.entries[0];
        assert_eq!(result.entries.len(), 1);
        assert_eq!(entry.status, MatchStatus::Matched);
        assert!(entry.confidence >= 0.9);
        assert_eq!(entry.matched_segments, vec![0]);
        assert!((entry.trimmed_start.unwrap() - 0.0).abs() < 1e-9);
        assert!((entry.trimmed_end.unwrap() - 1.0).abs() < 1e-9);
        assert!(result.unused_segments.is_empty());
    }

    #[test]
    fn test_no_shared_vocabulary() {
        let result = align("xyz qqq", &transcript(&["hello world", "good morning"])).unwrap();

        let entry = &result.entries[0];
        assert_eq!(entry.status, MatchStatus::Unmatched);
        assert!(entry.matched_segments.is_empty());
        assert_eq!(entry.confidence, 0.0);
        assert_eq!(entry.trimmed_start, None);
        assert_eq!(result.unused_segments, vec![0, 1]);
        assert_eq!(result.stats.avg_confidence, 0.0);
    }

    #[test]
    fn test_line_spanning_two_segments() {
        let script = "Quarterly numbers look terrible\nWe shipped the new billing system on time";
        let transcript = transcript(&["okay let's get started", "we shipped the new billing", "system on time"]);

        let result = align(script, &transcript).unwrap();

        assert_eq!(result.entries[1].matched_segments, vec![1, 2]);
        assert_eq!(result.entries[1].status, MatchStatus::Matched);
        assert!(result.entries[0].matched_segments.is_empty());
        assert_eq!(result.unused_segments, vec![0]);
        assert_contract(&result, 2, &AlignmentParams::default());
    }

    #[test]
    fn test_no_word_timestamps_uses_segment_bounds() {
        let transcript = transcript(&["first line of dialogue", "second line of dialogue"]);
        let result = align("First line of dialogue\nSecond line of dialogue", &transcript).unwrap();

        assert_eq!(result.entries[0].trimmed_start, Some(0.0));
        assert_eq!(result.entries[0].trimmed_end, Some(2.0));
        assert_eq!(result.entries[1].trimmed_start, Some(2.0));
        assert_eq!(result.entries[1].trimmed_end, Some(4.0));
    }

    #[test]
    fn test_word_timestamps_trim_range() {
        let transcript = Transcript::new(vec![TranscriptSegment::new(0, 10.0, 14.0, "uh welcome back everyone")
            .with_words(vec![
                Word::new("uh", 10.0, 10.3),
                Word::new("welcome", 10.8, 11.4),
                Word::new("back", 11.5, 11.9),
                Word::new("everyone", 12.0, 12.9),
            ])]);

        let result = align("Welcome back, everyone!", &transcript).unwrap();
        assert_eq!(result.entries[0].trimmed_start, Some(10.8));
        assert_eq!(result.entries[0].trimmed_end, Some(12.9));
    }

    #[test]
    fn test_entries_follow_split_lines() {
        let script = "Line one here\n\n-----\nLine two here\n***\nLine three here";
        let transcript = transcript(&["line one here", "line three here"]);

        let result = align(script, &transcript).unwrap();
        let expected = split_script_into_lines(script, normalize::DEFAULT_MAX_LINE_CHARS).len();

        assert_eq!(expected, 3);
        assert_eq!(result.stats.total_lines, 3);
        assert_eq!(result.entries[0].matched_segments, vec![0]);
        assert_eq!(result.entries[2].matched_segments, vec![1]);
        assert_contract(&result, expected, &AlignmentParams::default());
    }

    #[test]
    fn test_reordered_transcript_never_crosses() {
        let script = "the storm rolled in\nwe ran for shelter\nthe power went out\nmorning came slowly";
        let transcript = transcript(&[
            "morning came slowly",
            "the power went out",
            "the storm rolled in",
            "we ran for shelter",
        ]);

        let result = align(script, &transcript).unwrap();
        assert_contract(&result, 4, &AlignmentParams::default());
        assert_eq!(result.entries[0].matched_segments, vec![2]);
        assert_eq!(result.entries[1].matched_segments, vec![3]);
    }

    #[test]
    fn test_deterministic() {
        let script = "a quick brown fox\njumps over\nthe lazy dog\nand runs away";
        let transcript = transcript(&["a quick brown", "fox jumps over the", "lazy dog", "and then runs away"]);

        let first = align(script, &transcript).unwrap();
        let second = align(script, &transcript).unwrap();
        assert_eq!(first, second);
        assert_contract(&first, 4, &AlignmentParams::default());
    }

    #[test]
    fn test_invalid_input() {
        let transcript = transcript(&["hello"]);
        assert!(matches!(align("", &transcript), Err(SyncError::InvalidInput(_))));
        assert!(matches!(align("   \n\t", &transcript), Err(SyncError::InvalidInput(_))));
        assert!(matches!(align("---\n===", &transcript), Err(SyncError::InvalidInput(_))));
        assert!(matches!(align("hello", &Transcript::default()), Err(SyncError::InvalidInput(_))));
    }

    #[test]
    fn test_custom_thresholds_change_status_only() {
        let transcript = transcript(&["we shipped the billing system"]);
        let script = "We shipped the new billing system on time";

        let default = align(script, &transcript).unwrap();
        let strict = Aligner::new(AlignmentParams {
            matched_threshold: 0.99,
            approximate_threshold: 0.95,
            ..AlignmentParams::default()
        })
        .unwrap()
        .align(script, &transcript)
        .unwrap();

        assert_eq!(default.entries[0].matched_segments, strict.entries[0].matched_segments);
        assert_eq!(default.entries[0].confidence, strict.entries[0].confidence);
        assert_eq!(strict.entries[0].status, MatchStatus::Unmatched);
    }

    #[test]
    fn test_validate_params() {
        assert!(AlignmentParams::default().validate().is_ok());

        let inverted = AlignmentParams {
            approximate_threshold: 0.8,
            matched_threshold: 0.5,
            ..AlignmentParams::default()
        };
        assert!(matches!(inverted.validate(), Err(SyncError::Config(_))));

        let zero_weights = AlignmentParams {
            weights: ScoreWeights {
                jaccard: 0.0,
                lcs: 0.0,
                word_order: 0.0,
            },
            ..AlignmentParams::default()
        };
        assert!(zero_weights.validate().is_err());

        let no_lookahead = AlignmentParams {
            lookahead: Some(0),
            ..AlignmentParams::default()
        };
        assert!(no_lookahead.validate().is_err());
    }

    #[test]
    fn test_aligner_rejects_invalid_params() {
        let overweight = AlignmentParams {
            weights: ScoreWeights {
                jaccard: 1.0,
                lcs: 1.0,
                word_order: 1.0,
            },
            ..AlignmentParams::default()
        };
        assert!(matches!(Aligner::new(overweight), Err(SyncError::Config(_))));

        let nan_threshold = AlignmentParams {
            matched_threshold: f64::NAN,
            ..AlignmentParams::default()
        };
        assert!(matches!(Aligner::new(nan_threshold), Err(SyncError::Config(_))));

        let aligner = Aligner::new(AlignmentParams::default()).unwrap();
        let result = aligner.align("hello world", &transcript(&["hello world"])).unwrap();
        assert!(result.entries[0].confidence <= 1.0);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&MatchStatus::Approximate).unwrap();
        assert_eq!(json, "\"approximate\"");
    }
}
