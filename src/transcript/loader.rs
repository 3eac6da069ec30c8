//! Transcript file loaders (JSON, SRT, WebVTT).

use super::{Transcript, TranscriptSegment, Word};
use crate::error::{Result, SyncError};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static CUE_TIMING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*((?:\d+:)?\d{1,2}:\d{2}[.,]\d{1,3})\s*-->\s*((?:\d+:)?\d{1,2}:\d{2}[.,]\d{1,3})")
        .expect("Invalid regex")
});

/// Supported transcript input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    Json,
    Srt,
    Vtt,
}

impl std::str::FromStr for TranscriptFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(TranscriptFormat::Json),
            "srt" => Ok(TranscriptFormat::Srt),
            "vtt" | "webvtt" => Ok(TranscriptFormat::Vtt),
            _ => Err(format!("Unknown transcript format: {}. Use json, srt, or vtt.", s)),
        }
    }
}

impl TranscriptFormat {
    /// Guess the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("srt") => TranscriptFormat::Srt,
            Some("vtt") => TranscriptFormat::Vtt,
            _ => TranscriptFormat::Json,
        }
    }
}

/// Load a transcript file, detecting the format from the extension unless given.
pub fn load_transcript(path: &Path, format: Option<TranscriptFormat>) -> Result<Transcript> {
    let format = format.unwrap_or_else(|| TranscriptFormat::from_path(path));
    let content = std::fs::read_to_string(path)?;

    let transcript = match format {
        TranscriptFormat::Json => parse_json(&content)?,
        TranscriptFormat::Srt | TranscriptFormat::Vtt => parse_cues(&content)?,
    };

    debug!(
        "Loaded {} segments from {:?} ({:?})",
        transcript.segments.len(),
        path,
        format
    );
    Ok(transcript)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTranscript {
    Object { segments: Vec<RawSegment> },
    Segments(Vec<RawSegment>),
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    id: Option<u64>,
    #[serde(alias = "start_seconds")]
    start: f64,
    #[serde(alias = "end_seconds")]
    end: f64,
    #[serde(default)]
    text: String,
    #[serde(default)]
    words: Option<Vec<Word>>,
}

/// Parse a JSON transcript: `{"segments": [...]}` or a bare segment array.
///
/// Segment ids default to the segment's position.
pub fn parse_json(content: &str) -> Result<Transcript> {
    let raw: RawTranscript = serde_json::from_str(content)?;
    let raw_segments = match raw {
        RawTranscript::Object { segments } => segments,
        RawTranscript::Segments(segments) => segments,
    };

    let mut segments = Vec::with_capacity(raw_segments.len());
    for (position, raw) in raw_segments.into_iter().enumerate() {
        check_times(raw.start, raw.end, &format!("segment {}", position))?;
        segments.push(TranscriptSegment {
            id: raw.id.unwrap_or(position as u64),
            start: raw.start,
            end: raw.end,
            text: raw.text.trim().to_string(),
            words: raw.words.unwrap_or_default(),
        });
    }

    Ok(Transcript::new(segments))
}

/// Parse SRT or WebVTT cues into segments without word timestamps.
///
/// A cue ends at a blank (or whitespace-only) line or where the next timing line begins.
/// Lines outside a cue (the `WEBVTT` header, `NOTE` and `STYLE` blocks, cue numbers) are skipped.
pub fn parse_cues(content: &str) -> Result<Transcript> {
    let mut segments = Vec::new();
    let mut current: Option<PendingCue> = None;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if let Some(cue) = current.take() {
                cue.push_into(&mut segments);
            }
            continue;
        }

        if trimmed.contains("-->") {
            if let Some(mut cue) = current.take() {
                // An unseparated cue: its number was read as text of the previous one.
                if cue.text.last().is_some_and(|l| l.chars().all(|c| c.is_ascii_digit())) {
                    cue.text.pop();
                }
                cue.push_into(&mut segments);
            }
            current = Some(PendingCue::from_timing(trimmed)?);
            continue;
        }

        if let Some(cue) = current.as_mut() {
            cue.text.push(trimmed);
        }
    }

    if let Some(cue) = current.take() {
        cue.push_into(&mut segments);
    }

    Ok(Transcript::new(segments))
}

/// A cue whose timing line has been read and whose text is still being collected.
struct PendingCue<'a> {
    start: f64,
    end: f64,
    text: Vec<&'a str>,
}

impl<'a> PendingCue<'a> {
    fn from_timing(timing: &str) -> Result<Self> {
        let caps = CUE_TIMING_RE.captures(timing).ok_or_else(|| {
            SyncError::TranscriptFormat(format!("Malformed cue timing: {}", timing))
        })?;
        let start = parse_cue_timestamp(&caps[1])?;
        let end = parse_cue_timestamp(&caps[2])?;
        check_times(start, end, &format!("cue '{}'", timing))?;

        Ok(Self {
            start,
            end,
            text: Vec::new(),
        })
    }

    fn push_into(self, segments: &mut Vec<TranscriptSegment>) {
        let id = segments.len() as u64;
        segments.push(TranscriptSegment::new(id, self.start, self.end, self.text.join(" ")));
    }
}

/// Parse `HH:MM:SS,mmm`, `HH:MM:SS.mmm` or `MM:SS.mmm` into seconds.
fn parse_cue_timestamp(raw: &str) -> Result<f64> {
    let raw = raw.replace(',', ".");
    let parts: Vec<&str> = raw.split(':').collect();

    let invalid = || SyncError::TranscriptFormat(format!("Invalid timestamp: {}", raw));
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (
            h.parse::<f64>().map_err(|_| invalid())?,
            m.parse::<f64>().map_err(|_| invalid())?,
            s.parse::<f64>().map_err(|_| invalid())?,
        ),
        [m, s] => (
            0.0,
            m.parse::<f64>().map_err(|_| invalid())?,
            s.parse::<f64>().map_err(|_| invalid())?,
        ),
        _ => return Err(invalid()),
    };

    Ok(hours * 3600.0 + minutes * 60.0 + seconds)
}

fn check_times(start: f64, end: f64, what: &str) -> Result<()> {
    if !start.is_finite() || !end.is_finite() || start < 0.0 || end < start {
        return Err(SyncError::TranscriptFormat(format!(
            "{} has an invalid time range {}..{}",
            what, start, end
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_json_object() {
        let json = r#"{
            "language": "en",
            "segments": [
                {"id": 7, "start": 0.0, "end": 1.5, "text": " Hello world ",
                 "words": [{"word": "Hello", "start": 0.0, "end": 0.6},
                           {"word": "world", "start": 0.7, "end": 1.5}]},
                {"start_seconds": 1.5, "end_seconds": 3.0, "text": "Second"}
            ]
        }"#;

        let transcript = parse_json(json).unwrap();
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].id, 7);
        assert_eq!(transcript.segments[0].text, "Hello world");
        assert_eq!(transcript.segments[0].words[1].text, "world");
        assert_eq!(transcript.segments[1].id, 1);
        assert!(transcript.segments[1].words.is_empty());
    }

    #[test]
    fn test_parse_json_array() {
        let json = r#"[{"start": 0, "end": 2, "text": "only"}]"#;
        let transcript = parse_json(json).unwrap();
        assert_eq!(transcript.segments[0].id, 0);
        assert_eq!(transcript.segments[0].end, 2.0);
    }

    #[test]
    fn test_parse_json_rejects_reversed_range() {
        let json = r#"[{"start": 5, "end": 2, "text": "bad"}]"#;
        assert!(matches!(parse_json(json), Err(SyncError::TranscriptFormat(_))));
    }

    #[test]
    fn test_parse_srt() {
        let srt = "1\r\n00:00:00,000 --> 00:00:02,500\r\nHello world.\r\n\r\n2\r\n00:00:02,500 --> 00:00:05,000\r\nThis is\r\na test.\r\n";
        let transcript = parse_cues(srt).unwrap();

        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].end, 2.5);
        assert_eq!(transcript.segments[1].text, "This is a test.");
        assert_eq!(transcript.segments[1].id, 1);
    }

    #[test]
    fn test_parse_vtt() {
        let vtt = "WEBVTT\n\nNOTE generated\n\n00:01.000 --> 00:02.000 align:start\nShort form\n\nintro\n01:00:00.000 --> 01:00:01.250\nLong form\n";
        let transcript = parse_cues(vtt).unwrap();

        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].start, 1.0);
        assert_eq!(transcript.segments[1].start, 3600.0);
        assert_eq!(transcript.segments[1].end, 3601.25);
        assert_eq!(transcript.segments[1].text, "Long form");
    }

    #[test]
    fn test_parse_srt_whitespace_separator() {
        let srt = "1\n00:00:00,000 --> 00:00:01,000\nHi\n \n2\n00:00:01,000 --> 00:00:02,000\nThere\n\t\n";
        let transcript = parse_cues(srt).unwrap();

        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].text, "Hi");
        assert_eq!(transcript.segments[1].text, "There");
        assert_eq!(transcript.segments[1].start, 1.0);
    }

    #[test]
    fn test_parse_srt_missing_separator() {
        let srt = "1\n00:00:00,000 --> 00:00:01,000\nHi\n2\n00:00:01,000 --> 00:00:02,000\nThere\n";
        let transcript = parse_cues(srt).unwrap();

        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].text, "Hi");
        assert_eq!(transcript.segments[1].text, "There");
        assert_eq!(transcript.segments[1].id, 1);
    }

    #[test]
    fn test_parse_malformed_cue() {
        let srt = "1\nnonsense --> 00:00:01,000\nText\n";
        assert!(matches!(parse_cues(srt), Err(SyncError::TranscriptFormat(_))));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(TranscriptFormat::from_path(Path::new("a.SRT")), TranscriptFormat::Srt);
        assert_eq!(TranscriptFormat::from_path(Path::new("a.vtt")), TranscriptFormat::Vtt);
        assert_eq!(TranscriptFormat::from_path(Path::new("a.json")), TranscriptFormat::Json);
        assert_eq!("webvtt".parse::<TranscriptFormat>().unwrap(), TranscriptFormat::Vtt);
    }

    #[test]
    fn test_load_transcript_from_file() {
        let mut file = tempfile::Builder::new().suffix(".srt").tempfile().unwrap();
        write!(file, "1\n00:00:00,000 --> 00:00:01,000\nHi\n").unwrap();

        let transcript = load_transcript(file.path(), None).unwrap();
        assert_eq!(transcript.segments.len(), 1);
        assert_eq!(transcript.segments[0].text, "Hi");
    }
}
