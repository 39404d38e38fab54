//! Error types for the conversion stack
//!
//! Each stage (catalog loading, routing, probing, single operations, whole
//! pipelines) has its own enum so callers can match on what they can
//! actually recover from.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors raised while loading or parsing a conversion catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog document did not deserialize; covers missing `cost` or
    /// `operation` fields as well as syntactically broken JSON.
    #[error("malformed catalog entry: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised while routing between formats or assembling steps.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The requested start format is not a node in the graph.
    #[error("unknown start format '{0}'")]
    UnknownStart(String),

    /// A route references a conversion the graph does not contain.
    #[error("no conversion edge from '{from}' to '{to}'")]
    MissingEdge { from: String, to: String },
}

/// Errors raised while interrogating an external tool.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Errors raised by a single conversion operation.
#[derive(Debug, Error)]
pub enum OpError {
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} failed ({status}): {stderr}")]
    ToolFailed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The tool reported success but the expected file never appeared.
    #[error("{tool} produced no output at '{path}'")]
    MissingOutput { tool: String, path: PathBuf },

    #[error("image conversion failed: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors raised while executing an assembled pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A step names an operation the registry does not know. Checked for
    /// every step before any file is touched.
    #[error("step {index} ({from} -> {to}) names unknown operation '{operation}'")]
    UnknownOperation {
        index: usize,
        from: String,
        to: String,
        operation: String,
    },

    #[error("failed to stage working directory: {0}")]
    Workdir(#[source] io::Error),

    #[error("step {index} ({from} -> {to}, {operation}) failed: {source}")]
    StepFailed {
        index: usize,
        from: String,
        to: String,
        operation: String,
        #[source]
        source: OpError,
    },

    #[error("failed to place output at '{path}': {source}")]
    Deliver {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
