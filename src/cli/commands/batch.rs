//! Batch command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{load_manifest, Orchestrator};
use anyhow::Result;
use std::path::Path;

/// Run the batch command.
pub async fn run_batch(manifest: &str, jobs: Option<usize>, mut settings: Settings) -> Result<()> {
    let manifest_path = Path::new(manifest);
    if let Err(e) = preflight::check(Operation::Batch {
        manifest: manifest_path,
    }) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    if let Some(jobs) = jobs {
        settings.batch.max_concurrent = jobs;
    }

    let batch = load_manifest(manifest_path)?;
    if batch.is_empty() {
        Output::warning("Manifest contains no jobs.");
        return Ok(());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let pb = Output::progress_bar(batch.len() as u64, "aligning");
    let outcomes = orchestrator.run_batch(batch, &pb).await;
    pb.finish_and_clear();

    Output::header("Batch results");
    let mut failed = 0usize;
    for outcome in &outcomes {
        let name = outcome.job.script.display().to_string();
        match &outcome.result {
            Ok(stats) => Output::success(&format!(
                "{}: {}/{} matched, {} approximate (avg {:.3})",
                name, stats.matched, stats.total_lines, stats.approximate, stats.avg_confidence
            )),
            Err(e) => {
                failed += 1;
                Output::error(&format!("{}: {}", name, e));
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} batch jobs failed", failed, outcomes.len());
    }

    Output::success(&format!("All {} jobs aligned.", outcomes.len()));
    Ok(())
}
