//! Pre-flight checks before aligning.
//!
//! Validates that input files exist and formats are recognised before any work starts,
//! so a typo fails with a clear message instead of an IO error.

use crate::error::{Result, SyncError};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    /// Aligning needs a readable script and transcript.
    Align {
        script: &'a Path,
        transcript: &'a Path,
    },
    /// Batch mode needs a readable manifest.
    Batch { manifest: &'a Path },
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation<'_>) -> Result<()> {
    match operation {
        Operation::Align { script, transcript } => {
            check_file(script, "Script")?;
            check_file(transcript, "Transcript")?;
        }
        Operation::Batch { manifest } => {
            check_file(manifest, "Manifest")?;
        }
    }
    Ok(())
}

/// Check that a path points to an existing regular file.
fn check_file(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        return Err(SyncError::InvalidInput(format!(
            "{} file not found: {}",
            what,
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(SyncError::InvalidInput(format!(
            "{} path is not a file: {}",
            what,
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script.txt");
        std::fs::write(&script, "hello").unwrap();

        let ok = check(Operation::Align {
            script: &script,
            transcript: &script,
        });
        assert!(ok.is_ok());

        let missing = dir.path().join("missing.json");
        let err = check(Operation::Align {
            script: &script,
            transcript: &missing,
        })
        .unwrap_err();
        assert!(err.to_string().contains("Transcript file not found"));

        let err = check(Operation::Batch {
            manifest: dir.path(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("not a file"));
    }
}
