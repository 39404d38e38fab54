//! Extension aliases

use std::fs;
use std::path::Path;

use crate::error::OpError;
use crate::op::ConversionOp;

/// Handles pairs that are the same bytes under a different suffix, like
/// jpg/jpeg. Copies rather than renames: the input may be the caller's
/// original file.
pub struct RenameOp;

impl ConversionOp for RenameOp {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn run(&self, input: &Path, output: &Path) -> Result<(), OpError> {
        fs::copy(input, output)?;
        Ok(())
    }
}
