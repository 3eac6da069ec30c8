//! Token-sequence similarity signals.
//!
//! Three independent signals are blended into one bounded score:
//!
//! - **Jaccard** overlap of the distinct vocabularies, tolerant to reordering and edits.
//! - **LCS ratio**, the share of tokens that appear in the same relative order.
//! - **Word order**, how closely shared tokens sit at the same relative position.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Blend weights for [`ScoreWeights::score`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub jaccard: f64,
    pub lcs: f64,
    pub word_order: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            jaccard: 0.35,
            lcs: 0.45,
            word_order: 0.20,
        }
    }
}

impl ScoreWeights {
    /// Weighted blend of the three signals. Zero when either side is empty.
    pub fn score<S: AsRef<str>>(&self, a: &[S], b: &[S]) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        self.jaccard * jaccard(a, b) + self.lcs * lcs_ratio(a, b) + self.word_order * word_order_score(a, b)
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.jaccard + self.lcs + self.word_order
    }
}

/// Combined score with the default weights.
pub fn combined_score<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    ScoreWeights::default().score(a, b)
}

/// Intersection over union of the two token sets.
pub fn jaccard<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(AsRef::as_ref).collect();
    let set_b: HashSet<&str> = b.iter().map(AsRef::as_ref).collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

/// Longest common subsequence length over tokens.
///
/// Two rolling rows sized to the shorter input keep memory at O(min(len a, len b)).
pub fn lcs_length<S: AsRef<str>>(a: &[S], b: &[S]) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }

    let m = short.len();
    let mut prev = vec![0usize; m + 1];
    let mut curr = vec![0usize; m + 1];

    for long_token in long {
        for j in 1..=m {
            curr[j] = if long_token.as_ref() == short[j - 1].as_ref() {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

/// LCS length relative to the longer sequence.
pub fn lcs_ratio<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }
    lcs_length(a, b) as f64 / longest as f64
}

/// Agreement of relative first-occurrence positions of shared tokens.
///
/// No shared tokens scores 0. A single shared token scores a neutral 0.5 since order
/// cannot be measured from one point.
pub fn word_order_score<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    let first_in_b = first_positions(b);
    let first_in_a = first_positions(a);
    let denom_a = a.len().saturating_sub(1).max(1) as f64;
    let denom_b = b.len().saturating_sub(1).max(1) as f64;

    let mut shared = 0usize;
    let mut total_diff = 0.0;

    // Walk `a` in order so the float summation is reproducible.
    for (i, token) in a.iter().enumerate() {
        let token = token.as_ref();
        if first_in_a.get(token) != Some(&i) {
            continue;
        }
        let Some(&j) = first_in_b.get(token) else {
            continue;
        };

        shared += 1;
        total_diff += (i as f64 / denom_a - j as f64 / denom_b).abs();
    }

    match shared {
        0 => 0.0,
        1 => 0.5,
        n => (1.0 - total_diff / n as f64).max(0.0),
    }
}

fn first_positions<S: AsRef<str>>(tokens: &[S]) -> HashMap<&str, usize> {
    let mut positions = HashMap::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        positions.entry(token.as_ref()).or_insert(i);
    }
    positions
}
