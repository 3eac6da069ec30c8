//! Order-preserving optimal assignment of script lines to transcript windows.
//!
//! `dp[s][t]` holds the best total score for lines `s..S` when only segments `t..T`
//! are still available. Each line either skips (keeping `t`) or claims a window
//! `[t2, t2 + span)` with `t2 >= t`, which makes segments before `t2 + span` unavailable
//! to later lines. Windows never overlap and never cross.

use super::table::ScoreTable;
use super::MAX_SPAN;
use crate::error::{Result, SyncError};
use std::ops::Range;

/// One script line's traced decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub script_index: usize,
    /// Half-open segment range, `None` when the line was skipped.
    pub window: Option<Range<usize>>,
    /// Score of the claimed window, 0 for skipped lines.
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Choice {
    Skip,
    Match { start: usize, span: usize },
}

/// Knobs for the DP fill.
#[derive(Debug, Clone, Copy)]
pub struct SolverParams {
    /// Windows scoring below this are never considered.
    pub min_match_score: f64,
    /// Limit on how far past `t` a window may start. `None` searches the whole tail.
    pub lookahead: Option<usize>,
}

/// Flat row-major (line, segment) grid.
struct Grid<T> {
    width: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    fn new(rows: usize, width: usize, fill: T) -> Self {
        Self {
            width,
            cells: vec![fill; rows * width],
        }
    }

    fn get(&self, row: usize, col: usize) -> &T {
        &self.cells[row * self.width + col]
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        self.cells[row * self.width + col] = value;
    }
}

/// Fill the DP table and trace back one assignment per script line, in script order.
///
/// Ties keep the first option found: skip, then earlier window starts, then shorter spans.
pub fn solve(table: &ScoreTable, params: &SolverParams) -> Result<Vec<Assignment>> {
    let lines = table.line_count();
    let segments = table.segment_count();
    let width = segments + 1;

    let mut best = Grid::new(lines + 1, width, 0.0f64);
    let mut choices: Grid<Option<Choice>> = Grid::new(lines, width, None);

    for s in (0..lines).rev() {
        for t in (0..=segments).rev() {
            let mut value = *best.get(s + 1, t);
            let mut choice = Choice::Skip;

            let scan_end = match params.lookahead {
                Some(window) => segments.min(t.saturating_add(window)),
                None => segments,
            };

            for t2 in t..scan_end {
                for span in 1..=MAX_SPAN.min(segments - t2) {
                    let score = table.get(s, t2, span);
                    if score < params.min_match_score {
                        continue;
                    }
                    let candidate = score + *best.get(s + 1, t2 + span);
                    if candidate > value {
                        value = candidate;
                        choice = Choice::Match { start: t2, span };
                    }
                }
            }

            best.set(s, t, value);
            choices.set(s, t, Some(choice));
        }
    }

    trace(table, &choices, lines)
}

fn trace(
    table: &ScoreTable,
    choices: &Grid<Option<Choice>>,
    lines: usize,
) -> Result<Vec<Assignment>> {
    let mut assignments = Vec::with_capacity(lines);
    let mut t = 0usize;

    for s in 0..lines {
        let choice = choices.get(s, t).ok_or_else(|| {
            SyncError::Invariant(format!("traceback reached unrecorded state ({}, {})", s, t))
        })?;

        match choice {
            Choice::Skip => assignments.push(Assignment {
                script_index: s,
                window: None,
                score: 0.0,
            }),
            Choice::Match { start, span } => {
                if start < t || span == 0 || span > MAX_SPAN {
                    return Err(SyncError::Invariant(format!(
                        "line {} claims window {}+{} behind cursor {}",
                        s, start, span, t
                    )));
                }
                assignments.push(Assignment {
                    script_index: s,
                    window: Some(start..start + span),
                    score: table.get(s, start, span),
                });
                t = start + span;
            }
        }
    }

    Ok(assignments)
}
