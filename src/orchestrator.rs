//! Pipeline orchestrator for scriptsync.
//!
//! Coordinates loading inputs from disk, enforcing size limits, aligning, and writing
//! formatted output, for single pairs and for concurrent batches.

use crate::alignment::{
    split_script_into_lines, Aligner, AlignmentParams, AlignmentResult, AlignmentStats,
};
use crate::config::Settings;
use crate::error::{Result, SyncError};
use crate::format::{format_result, OutputFormat};
use crate::transcript::{load_transcript, Transcript, TranscriptFormat};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// One script/transcript pair in a batch manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchJob {
    /// Path to the script text file.
    pub script: PathBuf,
    /// Path to the transcript file.
    pub transcript: PathBuf,
    /// Where to write the result; relative paths resolve against the output directory.
    /// The extension picks the format.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// Outcome of a single batch job.
#[derive(Debug)]
pub struct BatchOutcome {
    pub job: BatchJob,
    pub result: Result<AlignmentStats>,
}

/// Read a batch manifest: a JSON array of jobs.
pub fn load_manifest(path: &Path) -> Result<Vec<BatchJob>> {
    let content = std::fs::read_to_string(path)?;
    let jobs: Vec<BatchJob> = serde_json::from_str(&content)?;
    Ok(jobs)
}

/// The main orchestrator for the scriptsync pipeline.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    settings: Settings,
    aligner: Arc<Aligner>,
    /// Bounded aligner for transcripts over `limits.auto_lookahead_above` segments.
    large_aligner: Option<Arc<Aligner>>,
}

impl Orchestrator {
    /// Create an orchestrator, validating the configured alignment parameters.
    pub fn new(settings: Settings) -> Result<Self> {
        let params = settings.alignment_params()?;
        if params.lookahead.is_some() {
            warn!(
                "Bounded lookahead of {:?} segments enabled; results may not be globally optimal",
                params.lookahead
            );
        }

        let limits = &settings.limits;
        let large_aligner = if params.lookahead.is_none() && limits.auto_lookahead_above > 0 {
            let bounded = AlignmentParams {
                lookahead: Some(limits.auto_lookahead),
                ..params.clone()
            };
            Some(Arc::new(Aligner::new(bounded)?))
        } else {
            None
        };

        Ok(Self {
            aligner: Arc::new(Aligner::new(params)?),
            large_aligner,
            settings,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the configured aligner.
    pub fn aligner(&self) -> &Aligner {
        &self.aligner
    }

    /// Pick the aligner for a transcript of `segment_count` segments.
    pub fn aligner_for(&self, segment_count: usize) -> &Aligner {
        match &self.large_aligner {
            Some(bounded) if segment_count > self.settings.limits.auto_lookahead_above => {
                warn!(
                    "Transcript has {} segments; limiting lookahead to {} segments",
                    segment_count, self.settings.limits.auto_lookahead
                );
                bounded.as_ref()
            }
            _ => self.aligner.as_ref(),
        }
    }

    /// Load a script and transcript from disk and check them against the size limits.
    pub fn load_inputs(
        &self,
        script_path: &Path,
        transcript_path: &Path,
        transcript_format: Option<TranscriptFormat>,
    ) -> Result<(String, Transcript)> {
        let script = std::fs::read_to_string(script_path)?;
        let transcript = load_transcript(transcript_path, transcript_format)?;
        self.check_limits(&script, &transcript)?;
        Ok((script, transcript))
    }

    /// Reject inputs larger than the configured limits.
    pub fn check_limits(&self, script: &str, transcript: &Transcript) -> Result<()> {
        let limits = &self.settings.limits;

        let line_count =
            split_script_into_lines(script, self.aligner.params().max_line_chars).len();
        if line_count > limits.max_script_lines {
            return Err(SyncError::InvalidInput(format!(
                "script has {} lines, limit is {}",
                line_count, limits.max_script_lines
            )));
        }

        if transcript.segments.len() > limits.max_segments {
            return Err(SyncError::InvalidInput(format!(
                "transcript has {} segments, limit is {}",
                transcript.segments.len(),
                limits.max_segments
            )));
        }

        Ok(())
    }

    /// Align a script file against a transcript file.
    #[instrument(skip(self))]
    pub fn align_files(
        &self,
        script_path: &Path,
        transcript_path: &Path,
        transcript_format: Option<TranscriptFormat>,
    ) -> Result<AlignmentResult> {
        let (script, transcript) = self.load_inputs(script_path, transcript_path, transcript_format)?;
        self.aligner_for(transcript.segments.len()).align(&script, &transcript)
    }

    /// Resolve a job's output path against the configured output directory.
    pub fn resolve_output(&self, output: &Path) -> PathBuf {
        if output.is_absolute() {
            output.to_path_buf()
        } else {
            self.settings.output_dir().join(output)
        }
    }

    /// Run one batch job synchronously, writing its output if requested.
    pub fn run_job(&self, job: &BatchJob) -> Result<AlignmentStats> {
        let result = self.align_files(&job.script, &job.transcript, None)?;

        if let Some(output) = &job.output {
            let path = self.resolve_output(output);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, format_result(&result, OutputFormat::from_path(&path)))?;
            info!("Wrote alignment for {:?} to {:?}", job.script, path);
        }

        Ok(result.stats)
    }

    /// Run many jobs concurrently. Each alignment runs on the blocking pool; a failing
    /// job is reported in its outcome without stopping the others.
    ///
    /// Outcomes are returned in manifest order.
    pub async fn run_batch(&self, jobs: Vec<BatchJob>, pb: &ProgressBar) -> Vec<BatchOutcome> {
        let concurrency = self.settings.batch_concurrency();
        info!("Running {} batch jobs, {} at a time", jobs.len(), concurrency);

        let mut stream = stream::iter(jobs.into_iter().enumerate())
            .map(|(idx, job)| {
                let this = self.clone();
                async move {
                    let task_job = job.clone();
                    let result = tokio::task::spawn_blocking(move || this.run_job(&task_job))
                        .await
                        .unwrap_or_else(|e| Err(SyncError::Batch(format!("alignment task failed: {}", e))));
                    (idx, BatchOutcome { job, result })
                }
            })
            .buffer_unordered(concurrency);

        let mut outcomes = Vec::new();
        while let Some((idx, outcome)) = stream.next().await {
            pb.inc(1);
            if let Err(e) = &outcome.result {
                warn!("Batch job {:?} failed: {}", outcome.job.script, e);
            }
            outcomes.push((idx, outcome));
        }

        outcomes.sort_by_key(|(idx, _)| *idx);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}
