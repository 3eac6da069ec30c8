//! Configuration settings for scriptsync.

use crate::alignment::AlignmentParams;
use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    /// Tuning constants handed to the aligner.
    pub alignment: AlignmentParams,
    pub limits: LimitSettings,
    pub batch: BatchSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error), used when no -v flag is given.
    pub log_level: String,
    /// Directory batch outputs with relative paths are written to.
    pub output_dir: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            output_dir: ".".to_string(),
        }
    }
}

/// Input size limits enforced before aligning.
///
/// The exact DP grows with lines x segments^2. Oversized inputs are rejected, and
/// transcripts past `auto_lookahead_above` segments fall back to a bounded lookahead
/// unless one is configured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LimitSettings {
    /// Maximum script lines after splitting.
    pub max_script_lines: usize,
    /// Maximum transcript segments.
    pub max_segments: usize,
    /// Segment count above which the automatic lookahead applies. 0 disables it.
    pub auto_lookahead_above: usize,
    /// Lookahead used for large transcripts.
    pub auto_lookahead: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_script_lines: 1000,
            max_segments: 3000,
            auto_lookahead_above: 800,
            auto_lookahead: 50,
        }
    }
}

/// Batch alignment settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchSettings {
    /// Maximum alignments running at once.
    pub max_concurrent: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| SyncError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scriptsync")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }

    /// Validated aligner parameters.
    pub fn alignment_params(&self) -> Result<AlignmentParams> {
        self.alignment.validate()?;
        Ok(self.alignment.clone())
    }

    /// Batch concurrency, never below one.
    pub fn batch_concurrency(&self) -> usize {
        self.batch.max_concurrent.max(1)
    }
}
