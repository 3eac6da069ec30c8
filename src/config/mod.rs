//! Configuration module for scriptsync.
//!
//! Handles loading and saving application settings, including the aligner's tuning constants.

mod settings;

pub use settings::{BatchSettings, GeneralSettings, LimitSettings, Settings};
