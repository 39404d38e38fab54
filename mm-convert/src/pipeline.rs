//! Pipeline execution
//!
//! Runs assembled conversion steps against a staged copy of the input. All
//! intermediate files live in a scoped temporary directory that is removed
//! on every exit path; the output path is only written after the last step
//! succeeded, so a failing pipeline never leaves a half-converted file
//! behind.

use std::fs;
use std::io;
use std::path::Path;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::registry::OperationRegistry;
use crate::route::ConversionStep;

/// Execute `steps` in order, reading `input` and producing `output`.
///
/// Every step's operation is resolved up front; an unknown name fails the
/// whole pipeline before any file is touched. Step `k` reads the working
/// file left by step `k - 1` (the original input for the first step) and
/// writes a staged file named after the input with the step's destination
/// extension appended. The final working file is moved onto `output`,
/// replacing whatever was there.
///
/// A zero-step pipeline copies the input to the output; the input file is
/// never moved or modified.
pub fn run_pipeline(
    registry: &OperationRegistry,
    steps: &[ConversionStep],
    input: &Path,
    output: &Path,
) -> Result<(), PipelineError> {
    let mut ops = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        match registry.get(&step.operation) {
            Some(op) => ops.push(op),
            None => {
                return Err(PipelineError::UnknownOperation {
                    index,
                    from: step.from.clone(),
                    to: step.to.clone(),
                    operation: step.operation.clone(),
                })
            }
        }
    }

    if steps.is_empty() {
        deliver_copy(input, output).map_err(|source| PipelineError::Deliver {
            path: output.to_path_buf(),
            source,
        })?;
        info!(output = %output.display(), "formats match, copied input");
        return Ok(());
    }

    let workdir = TempDir::new().map_err(PipelineError::Workdir)?;
    let file_name = input
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "input".into());

    let mut working = input.to_path_buf();
    for (index, (step, op)) in steps.iter().zip(&ops).enumerate() {
        let mut staged_name = file_name.clone();
        staged_name.push(format!(".{}", step.to));
        let staged = workdir.path().join(&staged_name);

        debug!(
            step = index,
            from = %step.from,
            to = %step.to,
            operation = %step.operation,
            "running conversion step"
        );
        op.run(&working, &staged)
            .map_err(|source| PipelineError::StepFailed {
                index,
                from: step.from.clone(),
                to: step.to.clone(),
                operation: step.operation.clone(),
                source,
            })?;
        working = staged;
    }

    deliver_move(&working, output).map_err(|source| PipelineError::Deliver {
        path: output.to_path_buf(),
        source,
    })?;
    info!(steps = steps.len(), output = %output.display(), "conversion finished");
    Ok(())
}

/// Replace `output` with the staged file. Falls back to a copy when the
/// rename crosses filesystems; the staged original is cleaned up with the
/// working directory either way.
fn deliver_move(staged: &Path, output: &Path) -> io::Result<()> {
    if output.is_file() {
        fs::remove_file(output)?;
    }
    if fs::rename(staged, output).is_err() {
        fs::copy(staged, output)?;
    }
    Ok(())
}

fn deliver_copy(input: &Path, output: &Path) -> io::Result<()> {
    if output.is_file() {
        fs::remove_file(output)?;
    }
    fs::copy(input, output)?;
    Ok(())
}
