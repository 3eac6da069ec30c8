//! Refine a matched window's boundaries with word-level timestamps.

use super::normalize::normalize;
use crate::transcript::TranscriptSegment;

/// A word flattened out of its segment, text already normalized.
#[derive(Debug, Clone, PartialEq)]
struct TimedWord {
    text: String,
    start: f64,
    end: f64,
}

/// Flatten word timestamps across segments. Segments without words contribute one
/// pseudo-word spanning the whole segment.
fn flatten_words(segments: &[TranscriptSegment]) -> Vec<TimedWord> {
    let mut words = Vec::new();
    for segment in segments {
        if segment.words.is_empty() {
            words.push(TimedWord {
                text: normalize(&segment.text),
                start: segment.start,
                end: segment.end,
            });
            continue;
        }
        words.extend(segment.words.iter().map(|w| TimedWord {
            text: normalize(&w.text),
            start: w.start,
            end: w.end,
        }));
    }
    words
}

/// Substring match in either direction, tolerating stemming and punctuation drift.
///
/// Words that normalize to nothing never match.
fn loosely_matches(word: &str, token: &str) -> bool {
    !word.is_empty() && !token.is_empty() && (word.contains(token) || token.contains(word))
}

/// Tightest `(start, end)` for `script_tokens` inside `segments`.
///
/// The start comes from the first word matching the line's first token, the end from the
/// last word matching its last token. Without a match the outermost words are used. When
/// the refined range collapses or inverts, the full segment range is returned instead.
/// Returns `None` only for an empty segment slice.
pub fn trim_to_words(script_tokens: &[String], segments: &[TranscriptSegment]) -> Option<(f64, f64)> {
    let first_segment = segments.first()?;
    let last_segment = segments.last()?;
    let words = flatten_words(segments);
    let (first_word, last_word) = (words.first()?, words.last()?);

    let first_token = script_tokens.first().map(String::as_str).unwrap_or_default();
    let last_token = script_tokens.last().map(String::as_str).unwrap_or_default();

    let start = words
        .iter()
        .find(|w| loosely_matches(&w.text, first_token))
        .unwrap_or(first_word)
        .start;
    let end = words
        .iter()
        .rev()
        .find(|w| loosely_matches(&w.text, last_token))
        .unwrap_or(last_word)
        .end;

    if start >= end {
        return Some((first_segment.start, last_segment.end));
    }
    Some((start, end))
}
