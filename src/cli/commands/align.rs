//! Align command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::format::{format_result, OutputFormat};
use crate::orchestrator::Orchestrator;
use crate::transcript::TranscriptFormat;
use anyhow::Result;
use std::path::Path;

/// Run the align command.
pub fn run_align(
    script: &str,
    transcript: &str,
    output: Option<String>,
    format: Option<&str>,
    transcript_format: Option<&str>,
    settings: Settings,
) -> Result<()> {
    let script_path = Path::new(script);
    let transcript_path = Path::new(transcript);

    if let Err(e) = preflight::check(Operation::Align {
        script: script_path,
        transcript: transcript_path,
    }) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let transcript_format: Option<TranscriptFormat> = transcript_format
        .map(|f| f.parse::<TranscriptFormat>().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()?;

    // Explicit flag wins, then the output extension, then a terminal report.
    let output_format = match (format, output.as_deref()) {
        (Some(f), _) => f.parse::<OutputFormat>().map_err(|e: String| anyhow::anyhow!(e))?,
        (None, Some(path)) if path != "-" => OutputFormat::from_path(Path::new(path)),
        _ => OutputFormat::Text,
    };

    let orchestrator = Orchestrator::new(settings)?;
    let result = match orchestrator.align_files(script_path, transcript_path, transcript_format) {
        Ok(result) => result,
        Err(e) => {
            Output::error(&format!("Alignment failed: {}", e));
            return Err(e.into());
        }
    };

    match output {
        Some(path) if path != "-" => {
            std::fs::write(&path, format_result(&result, output_format))?;
            Output::success(&format!(
                "Aligned {} lines ({} matched, {} approximate) to {}",
                result.stats.total_lines, result.stats.matched, result.stats.approximate, path
            ));
        }
        _ if output_format == OutputFormat::Text => {
            Output::alignment_report(&result);
        }
        _ => {
            println!("{}", format_result(&result, output_format));
        }
    }

    Ok(())
}
