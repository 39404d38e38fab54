//! Audio and video transcoding via ffmpeg

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::catalog::{CatalogProvider, EdgeSpec, FormatCatalog};
use crate::error::{OpError, ProbeError};
use crate::op::ConversionOp;
use crate::probe::{self, FFMPEG};
use crate::tools::run_tool;

const FFMPEG_COST: u64 = 15;

/// Discovers container pairs from `ffmpeg -formats`.
pub struct FfmpegProvider {
    binary: PathBuf,
}

impl FfmpegProvider {
    pub fn new(binary: PathBuf) -> Self {
        FfmpegProvider { binary }
    }
}

impl CatalogProvider for FfmpegProvider {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    fn discover(&self) -> Result<FormatCatalog, ProbeError> {
        let listing = probe::capture_stdout(FFMPEG, &self.binary, &["-formats"])?;
        let catalog = catalog_from_listing(&listing);
        debug!(
            sources = catalog.iter().count(),
            "ffmpeg formats discovered"
        );
        Ok(catalog)
    }
}

/// Parse `ffmpeg -formats` output. After the ` --` separator each row reads
/// ` DE name[,name] description` where `D` marks demuxing support and `E`
/// muxing support.
pub(crate) fn catalog_from_listing(listing: &str) -> FormatCatalog {
    let mut sources: BTreeSet<&str> = BTreeSet::new();
    let mut targets: BTreeSet<&str> = BTreeSet::new();

    let mut past_header = false;
    for line in listing.lines() {
        if !past_header {
            past_header = line.trim_start().starts_with("--");
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(flags), Some(names)) = (fields.next(), fields.next()) else {
            continue;
        };
        if !flags.chars().all(|c| matches!(c, 'D' | 'E')) {
            continue;
        }
        for name in names.split(',').filter(|name| !name.is_empty()) {
            if flags.contains('D') {
                sources.insert(name);
            }
            if flags.contains('E') {
                targets.insert(name);
            }
        }
    }

    let mut catalog = FormatCatalog::new();
    for from in &sources {
        for to in &targets {
            if from == to {
                continue;
            }
            catalog.insert(
                from,
                to,
                EdgeSpec::with_dependencies(FFMPEG_COST, "ffmpeg_transcode", [FFMPEG]),
            );
        }
    }
    catalog
}

pub(crate) fn transcode_args(input: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-nostdin".into(),
        "-loglevel".into(),
        "error".into(),
        "-y".into(),
        "-i".into(),
        input.as_os_str().to_os_string(),
        output.as_os_str().to_os_string(),
    ]
}

/// Transcodes between containers, letting ffmpeg pick codecs from the
/// output extension.
pub struct FfmpegTranscodeOp {
    binary: PathBuf,
}

impl FfmpegTranscodeOp {
    pub fn new(binary: PathBuf) -> Self {
        FfmpegTranscodeOp { binary }
    }
}

impl ConversionOp for FfmpegTranscodeOp {
    fn name(&self) -> &'static str {
        "ffmpeg_transcode"
    }

    fn run(&self, input: &Path, output: &Path) -> Result<(), OpError> {
        let mut command = Command::new(&self.binary);
        command.args(transcode_args(input, output));
        run_tool(FFMPEG, &mut command)
    }
}
