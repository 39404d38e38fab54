//! External tool probing
//!
//! The interesting converters shell out to ffmpeg, pandoc and poppler's
//! pdftoppm. This module resolves where those binaries live and verifies
//! that they actually answer, producing the available-tool set that the
//! router weighs routes against.
//!
//! Resolution order for each binary: explicitly configured path, then the
//! `MM_<TOOL>_BIN` environment override, then a PATH lookup.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::ProbeError;

/// Dependency name for ffmpeg-backed edges.
pub const FFMPEG: &str = "ffmpeg";
/// Dependency name for pandoc-backed edges.
pub const PANDOC: &str = "pandoc";
/// Dependency name for poppler-backed edges (the binary probed is pdftoppm).
pub const POPPLER: &str = "poppler";

/// Configured locations of the external binaries. `None` means resolve via
/// environment override or PATH.
#[derive(Debug, Clone, Default)]
pub struct ToolPaths {
    pub ffmpeg: Option<PathBuf>,
    pub pandoc: Option<PathBuf>,
    pub pdftoppm: Option<PathBuf>,
}

impl ToolPaths {
    pub fn ffmpeg_binary(&self) -> PathBuf {
        resolve_binary(self.ffmpeg.as_deref(), "MM_FFMPEG_BIN", "ffmpeg")
    }

    pub fn pandoc_binary(&self) -> PathBuf {
        resolve_binary(self.pandoc.as_deref(), "MM_PANDOC_BIN", "pandoc")
    }

    pub fn pdftoppm_binary(&self) -> PathBuf {
        resolve_binary(self.pdftoppm.as_deref(), "MM_PDFTOPPM_BIN", "pdftoppm")
    }

    fn binary_for(&self, tool: &str) -> PathBuf {
        match tool {
            FFMPEG => self.ffmpeg_binary(),
            PANDOC => self.pandoc_binary(),
            POPPLER => self.pdftoppm_binary(),
            other => PathBuf::from(other),
        }
    }
}

/// Falls back to the bare name when nothing resolves, so a genuinely
/// missing tool surfaces as a normal not-found error at spawn time.
fn resolve_binary(configured: Option<&Path>, env_var: &str, name: &str) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(env_var) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    which::which(name).unwrap_or_else(|_| PathBuf::from(name))
}

/// How one tool is probed: version flags plus the prefix expected on the
/// first output line. `banner: None` means mere presence suffices.
struct ToolProbe {
    tool: &'static str,
    flags: &'static [&'static str],
    banner: Option<&'static str>,
}

const PROBES: &[ToolProbe] = &[
    ToolProbe {
        tool: FFMPEG,
        flags: &["-version"],
        banner: Some("ffmpeg version"),
    },
    ToolProbe {
        tool: PANDOC,
        flags: &["--version"],
        banner: Some("pandoc"),
    },
    ToolProbe {
        tool: POPPLER,
        flags: &[],
        banner: None,
    },
];

/// Probe outcome for one tool.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub tool: &'static str,
    pub binary: PathBuf,
    pub available: bool,
}

/// Probe every known tool, in a fixed order.
pub fn probe_report(paths: &ToolPaths) -> Vec<ToolStatus> {
    PROBES
        .iter()
        .map(|probe| {
            let binary = paths.binary_for(probe.tool);
            let available = verify_tool(&binary, probe.flags, probe.banner);
            debug!(tool = probe.tool, binary = %binary.display(), available, "probed tool");
            ToolStatus {
                tool: probe.tool,
                binary,
                available,
            }
        })
        .collect()
}

/// Names of the tools usable right now; this is the router's available set.
pub fn probe_tools(paths: &ToolPaths) -> BTreeSet<String> {
    probe_report(paths)
        .into_iter()
        .filter(|status| status.available)
        .map(|status| status.tool.to_string())
        .collect()
}

/// Capture a tool's stdout, treating a failed launch or nonzero exit as an
/// error. Providers use this for their discovery commands.
pub(crate) fn capture_stdout(
    tool: &'static str,
    binary: &Path,
    args: &[&str],
) -> Result<String, ProbeError> {
    let output = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|source| ProbeError::Spawn { tool, source })?;
    if !output.status.success() {
        return Err(ProbeError::Spawn {
            tool,
            source: std::io::Error::other(format!("exited with {}", output.status)),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// A tool verifies when its binary exists and, if a banner is expected, the
/// first line of its version output starts with it.
fn verify_tool(binary: &Path, flags: &[&str], banner: Option<&str>) -> bool {
    if locate(binary).is_none() {
        return false;
    }
    let Some(prefix) = banner else {
        return true;
    };
    let output = match Command::new(binary)
        .args(flags)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(_) => return false,
    };
    if !output.status.success() {
        return false;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .is_some_and(|line| line.starts_with(prefix))
}

fn locate(binary: &Path) -> Option<PathBuf> {
    if binary.components().count() > 1 {
        binary.is_file().then(|| binary.to_path_buf())
    } else {
        which::which(binary).ok()
    }
}
