//! PDF rasterization via poppler's pdftoppm

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::ImageFormat;

use crate::catalog::{CatalogProvider, EdgeSpec, FormatCatalog};
use crate::detect::extension_of;
use crate::error::{OpError, ProbeError};
use crate::op::ConversionOp;
use crate::probe::POPPLER;
use crate::tools::image::save_for_extension;
use crate::tools::run_tool;

const PDF_COST: u64 = 10;

/// Advertises pdf -> raster edges. The set is static: whether poppler is
/// actually installed shows up as an edge dependency, not as a missing
/// edge.
pub struct PopplerProvider;

impl CatalogProvider for PopplerProvider {
    fn name(&self) -> &'static str {
        "poppler"
    }

    fn discover(&self) -> Result<FormatCatalog, ProbeError> {
        let mut catalog = FormatCatalog::new();
        for format in ImageFormat::all().filter(ImageFormat::writing_enabled) {
            for extension in format.extensions_str() {
                catalog.insert(
                    "pdf",
                    extension,
                    EdgeSpec::with_dependencies(PDF_COST, "pdf_rasterize", [POPPLER]),
                );
            }
        }
        Ok(catalog)
    }
}

pub(crate) fn rasterize_args(dpi: u32, input: &Path, prefix: &Path) -> Vec<OsString> {
    vec![
        "-singlefile".into(),
        "-r".into(),
        dpi.to_string().into(),
        "-png".into(),
        input.as_os_str().to_os_string(),
        prefix.as_os_str().to_os_string(),
    ]
}

/// Rasterizes the first page of a PDF into the requested image format.
///
/// pdftoppm always writes `<prefix>.png`; when the target is not PNG the
/// scratch page is re-encoded in process.
pub struct PdfRasterizeOp {
    binary: PathBuf,
    dpi: u32,
}

impl PdfRasterizeOp {
    pub fn new(binary: PathBuf, dpi: u32) -> Self {
        PdfRasterizeOp { binary, dpi }
    }
}

impl ConversionOp for PdfRasterizeOp {
    fn name(&self) -> &'static str {
        "pdf_rasterize"
    }

    fn run(&self, input: &Path, output: &Path) -> Result<(), OpError> {
        let mut prefix = output.as_os_str().to_os_string();
        prefix.push(".page");
        let prefix = PathBuf::from(prefix);
        let mut scratch = prefix.as_os_str().to_os_string();
        scratch.push(".png");
        let scratch = PathBuf::from(scratch);

        let mut command = Command::new(&self.binary);
        command.args(rasterize_args(self.dpi, input, &prefix));
        run_tool("pdftoppm", &mut command)?;

        if !scratch.is_file() {
            return Err(OpError::MissingOutput {
                tool: "pdftoppm".to_string(),
                path: scratch,
            });
        }

        if extension_of(output).as_deref() == Some("png") {
            fs::rename(&scratch, output)?;
            return Ok(());
        }

        let page = image::open(&scratch)?;
        let saved = save_for_extension(page, output);
        let _ = fs::remove_file(&scratch);
        saved
    }
}
