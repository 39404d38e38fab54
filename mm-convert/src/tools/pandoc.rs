//! Document conversion via pandoc
//!
//! Discovery asks the binary for its reader and writer lists and maps the
//! pandoc format names onto file extensions. Execution maps back the other
//! way, because a staged file only carries an extension and pandoc wants
//! its own names on `-f`/`-t`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::catalog::{CatalogProvider, EdgeSpec, FormatCatalog};
use crate::detect::extension_of;
use crate::error::{OpError, ProbeError};
use crate::op::ConversionOp;
use crate::probe::{self, PANDOC};
use crate::tools::run_tool;

const PANDOC_COST: u64 = 5;

/// Discovers document pairs by asking pandoc what it reads and writes.
pub struct PandocProvider {
    binary: PathBuf,
}

impl PandocProvider {
    pub fn new(binary: PathBuf) -> Self {
        PandocProvider { binary }
    }
}

impl CatalogProvider for PandocProvider {
    fn name(&self) -> &'static str {
        "pandoc"
    }

    fn discover(&self) -> Result<FormatCatalog, ProbeError> {
        let inputs = probe::capture_stdout(PANDOC, &self.binary, &["--list-input-formats"])?;
        let outputs = probe::capture_stdout(PANDOC, &self.binary, &["--list-output-formats"])?;
        let catalog = catalog_from_lists(&inputs, &outputs);
        debug!(edges = catalog.iter().map(|(_, d)| d.len()).sum::<usize>(), "pandoc formats discovered");
        Ok(catalog)
    }
}

/// Pure half of discovery, split out so it can be fed captured listings.
pub(crate) fn catalog_from_lists(inputs: &str, outputs: &str) -> FormatCatalog {
    let sources: Vec<&str> = inputs
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(format_extension)
        .collect();
    let targets: Vec<&str> = outputs
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(format_extension)
        .collect();

    let mut catalog = FormatCatalog::new();
    for from in &sources {
        for to in &targets {
            if from == to {
                continue;
            }
            catalog.insert(
                from,
                to,
                EdgeSpec::with_dependencies(PANDOC_COST, "pandoc_convert", [PANDOC]),
            );
        }
    }
    catalog
}

/// Map a pandoc format name to the extension such a file normally carries.
/// Names missing from the table already are their own extension.
pub(crate) fn format_extension(format: &str) -> &str {
    match format {
        "biblatex" | "bibtex" => "bib",
        "bits" | "docbook" | "endnotexml" | "jats" => "xml",
        "commonmark" | "commonmark_x" | "gfm" | "markdown" | "markdown_github"
        | "markdown_mmd" | "markdown_phpextra" | "markdown_strict" => "md",
        "csljson" => "json",
        "djot" => "dj",
        "dokuwiki" | "jira" | "native" | "plain" | "t2t" | "tikiwiki" | "twiki" => "txt",
        "haddock" => "hs",
        "latex" => "tex",
        "mediawiki" | "vimwiki" => "wiki",
        "typst" => "typ",
        other => other,
    }
}

/// Preferred pandoc reader for a file extension.
fn reader_for(extension: &str) -> &str {
    match extension {
        "md" | "markdown" | "txt" => "markdown",
        "bib" => "bibtex",
        "dj" => "djot",
        "hs" => "haddock",
        "tex" => "latex",
        "typ" => "typst",
        "wiki" => "mediawiki",
        "xml" => "docbook",
        other => other,
    }
}

/// Preferred pandoc writer for a file extension. Differs from the reader
/// side for plain text, which pandoc only writes under the name `plain`.
fn writer_for(extension: &str) -> &str {
    match extension {
        "md" | "markdown" => "markdown",
        "txt" => "plain",
        "bib" => "bibtex",
        "dj" => "djot",
        "hs" => "haddock",
        "tex" => "latex",
        "typ" => "typst",
        "wiki" => "mediawiki",
        "xml" => "docbook",
        other => other,
    }
}

pub(crate) fn pandoc_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    if let Some(extension) = extension_of(input) {
        args.push("-f".into());
        args.push(reader_for(&extension).into());
    }
    if let Some(extension) = extension_of(output) {
        args.push("-t".into());
        args.push(writer_for(&extension).into());
    }
    args.push(input.as_os_str().to_os_string());
    args.push("-o".into());
    args.push(output.as_os_str().to_os_string());
    args
}

/// Converts between document formats by shelling out to pandoc.
pub struct PandocConvertOp {
    binary: PathBuf,
}

impl PandocConvertOp {
    pub fn new(binary: PathBuf) -> Self {
        PandocConvertOp { binary }
    }
}

impl ConversionOp for PandocConvertOp {
    fn name(&self) -> &'static str {
        "pandoc_convert"
    }

    fn run(&self, input: &Path, output: &Path) -> Result<(), OpError> {
        let mut command = Command::new(&self.binary);
        command.args(pandoc_args(input, output));
        run_tool(PANDOC, &mut command)
    }
}
