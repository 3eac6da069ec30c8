//! Text normalization and script segmentation.
//!
//! Everything downstream compares token sequences produced here, so script lines and
//! transcript windows must go through the same `tokenize` call.

use regex::Regex;
use std::sync::LazyLock;

/// Default character limit above which a script line is split into sentences.
pub const DEFAULT_MAX_LINE_CHARS: usize = 200;

static STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s']").expect("Invalid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-=*_]{3,}$").expect("Invalid regex"));
static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("Invalid regex"));

/// A single alignable unit of the script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    /// Position in script order, starting at 0.
    pub index: usize,
    /// The trimmed line as written.
    pub text: String,
    /// Normalized tokens, in order, duplicates kept.
    pub tokens: Vec<String>,
}

impl ScriptLine {
    pub fn new(index: usize, text: String) -> Self {
        let tokens = tokenize(&text);
        Self {
            index,
            text,
            tokens,
        }
    }
}

/// Lowercase, fold typographic apostrophes to `'`, strip everything but word characters,
/// whitespace and apostrophes, collapse whitespace and trim.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");
    let stripped = STRIP_RE.replace_all(&lowered, "");
    WHITESPACE_RE
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

/// Normalize and split into word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return Vec::new();
    }
    normalized.split(' ').map(str::to_string).collect()
}

/// Split raw script text into alignable lines.
///
/// Blank lines and separator rules (`---`, `===`, `***`, `___`) are dropped. Lines longer
/// than `max_line_chars` characters are broken into sentences so a single paragraph cannot
/// blow up the per-line token count.
pub fn split_script_into_lines(script: &str, max_line_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for piece in script.split('\n') {
        let trimmed = piece.trim();
        if trimmed.is_empty() || SEPARATOR_RE.is_match(trimmed) {
            continue;
        }

        if trimmed.chars().count() > max_line_chars {
            lines.extend(split_sentences(trimmed));
        } else {
            lines.push(trimmed.to_string());
        }
    }

    lines
}

/// Build indexed, tokenized script lines.
pub fn script_lines(script: &str, max_line_chars: usize) -> Vec<ScriptLine> {
    split_script_into_lines(script, max_line_chars)
        .into_iter()
        .enumerate()
        .map(|(index, text)| ScriptLine::new(index, text))
        .collect()
}

/// Break text after `.`, `!` or `?` when followed by whitespace.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut last = 0;

    for m in SENTENCE_END_RE.find_iter(text) {
        // The punctuation mark is a single byte; keep it with its sentence.
        push_sentence(&mut sentences, &text[last..m.start() + 1]);
        last = m.end();
    }
    push_sentence(&mut sentences, &text[last..]);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, candidate: &str) {
    let sentence = candidate.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}
