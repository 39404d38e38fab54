//! Converter integrations
//!
//! One module per converter family. Each pairs the catalog provider that
//! discovers what the tool can do with the operation that actually runs it,
//! so everything about a tool lives in one place.

pub mod ffmpeg;
pub mod image;
pub mod pandoc;
pub mod poppler;
pub mod rename;

use std::process::{Command, Stdio};

use crate::catalog::CatalogProvider;
use crate::error::OpError;
use crate::probe::ToolPaths;

/// The default provider set, in merge order.
pub fn default_providers(paths: &ToolPaths) -> Vec<Box<dyn CatalogProvider>> {
    vec![
        Box::new(image::ImageProvider),
        Box::new(pandoc::PandocProvider::new(paths.pandoc_binary())),
        Box::new(poppler::PopplerProvider),
        Box::new(ffmpeg::FfmpegProvider::new(paths.ffmpeg_binary())),
    ]
}

/// Run an external converter to completion, turning a nonzero exit into an
/// error carrying the tool's stderr.
pub(crate) fn run_tool(tool: &str, command: &mut Command) -> Result<(), OpError> {
    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|source| OpError::Launch {
            tool: tool.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(OpError::ToolFailed {
            tool: tool.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
