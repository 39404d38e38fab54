//! In-process raster conversion
//!
//! Backed by the image crate, so these edges need no external tool and are
//! the cheapest non-rename conversions in the catalog.

use std::path::Path;

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::catalog::{CatalogProvider, EdgeSpec, FormatCatalog};
use crate::error::{OpError, ProbeError};
use crate::op::ConversionOp;

const IMAGE_COST: u64 = 2;

/// Advertises every decodable-to-encodable extension pair the image crate
/// supports in this build.
pub struct ImageProvider;

impl CatalogProvider for ImageProvider {
    fn name(&self) -> &'static str {
        "image"
    }

    fn discover(&self) -> Result<FormatCatalog, ProbeError> {
        let readable: Vec<&str> = ImageFormat::all()
            .filter(ImageFormat::reading_enabled)
            .flat_map(|format| format.extensions_str().iter().copied())
            .collect();
        let writable: Vec<&str> = ImageFormat::all()
            .filter(ImageFormat::writing_enabled)
            .flat_map(|format| format.extensions_str().iter().copied())
            .collect();

        let mut catalog = FormatCatalog::new();
        for from in &readable {
            for to in &writable {
                if from == to {
                    continue;
                }
                catalog.insert(from, to, EdgeSpec::new(IMAGE_COST, "image_convert"));
            }
        }
        debug!(
            readable = readable.len(),
            writable = writable.len(),
            "image formats discovered"
        );
        Ok(catalog)
    }
}

/// Re-encodes a raster image into the format implied by the output
/// extension.
pub struct ImageConvertOp;

impl ConversionOp for ImageConvertOp {
    fn name(&self) -> &'static str {
        "image_convert"
    }

    fn run(&self, input: &Path, output: &Path) -> Result<(), OpError> {
        let decoded = image::open(input)?;
        save_for_extension(decoded, output)
    }
}

/// Save honoring the output extension. JPEG cannot carry an alpha channel,
/// so anything heading there is flattened to RGB first.
pub(crate) fn save_for_extension(decoded: DynamicImage, output: &Path) -> Result<(), OpError> {
    let format = ImageFormat::from_path(output)?;
    if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(decoded.to_rgb8()).save_with_format(output, format)?;
    } else {
        decoded.save_with_format(output, format)?;
    }
    Ok(())
}
