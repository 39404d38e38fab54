//! Operation registry for looking conversions up by name
//!
//! Catalog edges carry operation identifiers as plain strings; this registry
//! maps them to runnable [`ConversionOp`] implementations. Operations can be
//! registered and retrieved by name.

use std::collections::HashMap;

use crate::op::ConversionOp;
use crate::probe::ToolPaths;
use crate::tools;

/// Registry of conversion operations.
#[derive(Default)]
pub struct OperationRegistry {
    ops: HashMap<String, Box<dyn ConversionOp>>,
}

impl OperationRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation
    ///
    /// If an operation with the same name already exists, it will be
    /// replaced.
    pub fn register<O: ConversionOp + 'static>(&mut self, op: O) {
        self.ops.insert(op.name().to_string(), Box::new(op));
    }

    /// Get an operation by name
    pub fn get(&self, name: &str) -> Option<&dyn ConversionOp> {
        self.ops.get(name).map(|op| op.as_ref())
    }

    /// Check if an operation exists
    pub fn has(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    /// List all registered operation names (sorted)
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.ops.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with every operation the builtin catalog and the
    /// discovery providers refer to, wired to the given tool paths.
    pub fn with_defaults(paths: &ToolPaths, raster_dpi: u32) -> Self {
        let mut registry = Self::new();
        registry.register(tools::rename::RenameOp);
        registry.register(tools::image::ImageConvertOp);
        registry.register(tools::pandoc::PandocConvertOp::new(paths.pandoc_binary()));
        registry.register(tools::poppler::PdfRasterizeOp::new(
            paths.pdftoppm_binary(),
            raster_dpi,
        ));
        registry.register(tools::ffmpeg::FfmpegTranscodeOp::new(paths.ffmpeg_binary()));
        registry
    }
}
