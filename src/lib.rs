//! scriptsync - Script to Transcript Alignment
//!
//! Aligns a human-written script (one utterance per line) against a machine-generated,
//! time-stamped transcript, producing a per-line time range and confidence score.
//!
//! # Overview
//!
//! scriptsync allows you to:
//! - Find where each scripted line was actually spoken in a recording
//! - Tighten matched ranges to word boundaries when word timestamps are available
//! - Spot script lines that were dropped or ad-libbed, and transcript segments that
//!   match nothing in the script
//! - Export the aligned script as JSON, SRT, or WebVTT
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `alignment` - The alignment engine (normalization, scoring, DP, trimming)
//! - `transcript` - Transcript data model and file loaders
//! - `format` - Output formatting
//! - `config` - Configuration management
//! - `orchestrator` - File loading, limits, and batch coordination
//!
//! # Example
//!
//! ```rust
//! use scriptsync::alignment::align;
//! use scriptsync::transcript::{Transcript, TranscriptSegment};
//!
//! let transcript = Transcript::new(vec![
//!     TranscriptSegment::new(0, 0.0, 2.1, "so welcome to the show"),
//!     TranscriptSegment::new(1, 2.1, 4.0, "today we're talking about tides"),
//! ]);
//!
//! let result = align("Welcome to the show.\nToday we're talking about tides.", &transcript)?;
//! assert_eq!(result.stats.total_lines, 2);
//! assert_eq!(result.entries[1].matched_segments, vec![1]);
//! # Ok::<(), scriptsync::SyncError>(())
//! ```

pub mod alignment;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod orchestrator;
pub mod transcript;

pub use error::{Result, SyncError};
