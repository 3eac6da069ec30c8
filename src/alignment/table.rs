//! Precomputed similarity scores for every (line, window start, span) triple.

use super::normalize::{tokenize, ScriptLine};
use super::similarity::ScoreWeights;
use super::MAX_SPAN;
use crate::transcript::TranscriptSegment;

/// Tokenized text of every contiguous transcript window of 1..=MAX_SPAN segments.
///
/// Lives for a single alignment call so no window is tokenized twice.
pub struct WindowTokens {
    segment_count: usize,
    windows: Vec<Vec<String>>,
}

impl WindowTokens {
    pub fn build(segments: &[TranscriptSegment]) -> Self {
        let segment_count = segments.len();
        let mut windows = Vec::with_capacity(segment_count * MAX_SPAN);

        for start in 0..segment_count {
            for span in 1..=MAX_SPAN {
                if start + span > segment_count {
                    windows.push(Vec::new());
                    continue;
                }
                windows.push(tokenize(&window_text(&segments[start..start + span])));
            }
        }

        Self {
            segment_count,
            windows,
        }
    }

    /// Tokens for the window `[start, start + span)`, or `None` past the end.
    pub fn get(&self, start: usize, span: usize) -> Option<&[String]> {
        if span == 0 || span > MAX_SPAN || start + span > self.segment_count {
            return None;
        }
        Some(&self.windows[start * MAX_SPAN + span - 1])
    }
}

/// Join segment texts with single spaces.
pub fn window_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Dense score table indexed by (script line, window start, span).
#[derive(Debug, Clone)]
pub struct ScoreTable {
    line_count: usize,
    segment_count: usize,
    scores: Vec<f64>,
}

impl ScoreTable {
    pub fn build(lines: &[ScriptLine], segments: &[TranscriptSegment], weights: &ScoreWeights) -> Self {
        let windows = WindowTokens::build(segments);
        let segment_count = segments.len();
        let mut scores = vec![0.0; lines.len() * segment_count * MAX_SPAN];

        for (s, line) in lines.iter().enumerate() {
            for t in 0..segment_count {
                for span in 1..=MAX_SPAN {
                    let Some(tokens) = windows.get(t, span) else {
                        break;
                    };
                    let offset = Self::offset(segment_count, s, t, span);
                    scores[offset] = weights.score(line.tokens.as_slice(), tokens);
                }
            }
        }

        Self {
            line_count: lines.len(),
            segment_count,
            scores,
        }
    }

    /// Score of line `s` against window `[t, t + span)`; 0 for windows outside the transcript.
    pub fn get(&self, s: usize, t: usize, span: usize) -> f64 {
        if s >= self.line_count || span == 0 || span > MAX_SPAN || t + span > self.segment_count {
            return 0.0;
        }
        self.scores[Self::offset(self.segment_count, s, t, span)]
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    fn offset(segment_count: usize, s: usize, t: usize, span: usize) -> usize {
        (s * segment_count + t) * MAX_SPAN + span - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments() -> Vec<TranscriptSegment> {
        vec![
            TranscriptSegment::new(0, 0.0, 1.0, "Hello there."),
            TranscriptSegment::new(1, 1.0, 2.0, "General"),
            TranscriptSegment::new(2, 2.0, 3.0, "Kenobi!"),
        ]
    }

    #[test]
    fn test_window_tokens() {
        let windows = WindowTokens::build(&segments());
        assert_eq!(windows.get(0, 1).unwrap(), ["hello", "there"]);
        assert_eq!(windows.get(1, 2).unwrap(), ["general", "kenobi"]);
        assert_eq!(windows.get(0, 3).unwrap().len(), 4);
        assert!(windows.get(2, 2).is_none());
        assert!(windows.get(0, 4).is_none());
    }

    #[test]
    fn test_score_table_lookup() {
        let lines = vec![
            ScriptLine::new(0, "Hello there".to_string()),
            ScriptLine::new(1, "General Kenobi".to_string()),
        ];
        let table = ScoreTable::build(&lines, &segments(), &ScoreWeights::default());

        assert_eq!(table.line_count(), 2);
        assert_eq!(table.segment_count(), 3);
        assert!((table.get(0, 0, 1) - 1.0).abs() < 1e-9);
        assert!((table.get(1, 1, 2) - 1.0).abs() < 1e-9);
        assert_eq!(table.get(1, 0, 1), 0.0);
        assert_eq!(table.get(1, 2, 2), 0.0);
        assert!(table.get(1, 1, 1) > 0.0 && table.get(1, 1, 1) < 1.0);
    }
}
