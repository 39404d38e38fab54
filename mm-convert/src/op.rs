//! The conversion operation seam
//!
//! Every catalog edge names an operation. The executor resolves the name
//! through an [`OperationRegistry`](crate::registry::OperationRegistry) and
//! hands the operation the current working file plus the path it must
//! produce. Operations own the transformation; the pipeline owns staging
//! and file movement.

use std::path::Path;

use crate::error::OpError;

/// A single named file conversion.
pub trait ConversionOp {
    /// Identifier catalog edges refer to this operation by.
    fn name(&self) -> &'static str;

    /// Read `input`, write `output`. Must not touch anything else.
    fn run(&self, input: &Path, output: &Path) -> Result<(), OpError>;
}
