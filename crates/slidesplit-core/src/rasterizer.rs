//! Page rasterization
//!
//! Boundary detection only needs the first page as pixels. The default
//! backend shells out to poppler's `pdftoppm` and decodes its PNG output.

use crate::error::SlideSplitError;
use crate::raster::RasterImage;
use std::io;
use std::path::PathBuf;
use std::process::Command;

/// Resolution `pdftoppm` renders at unless told otherwise.
pub const DEFAULT_DPI: u32 = 200;

/// Renders the first page of a PDF to an RGB image.
pub trait PageRasterizer {
    fn rasterize_first_page(&self, pdf: &[u8]) -> Result<RasterImage, SlideSplitError>;
}

impl<R: PageRasterizer + ?Sized> PageRasterizer for &R {
    fn rasterize_first_page(&self, pdf: &[u8]) -> Result<RasterImage, SlideSplitError> {
        (**self).rasterize_first_page(pdf)
    }
}

/// Rasterizer backed by the `pdftoppm` executable.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    pub program: PathBuf,
    pub dpi: u32,
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self {
            program: PathBuf::from("pdftoppm"),
            dpi: DEFAULT_DPI,
        }
    }
}

impl PdftoppmRasterizer {
    pub fn new(program: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            program: program.into(),
            dpi,
        }
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize_first_page(&self, pdf: &[u8]) -> Result<RasterImage, SlideSplitError> {
        let io_err = |e: io::Error| SlideSplitError::RasterizeFailed(e.to_string());

        let temp_dir = tempfile::Builder::new()
            .prefix("slidesplit_")
            .tempdir()
            .map_err(io_err)?;
        let input = temp_dir.path().join("input.pdf");
        std::fs::write(&input, pdf).map_err(io_err)?;

        // -singlefile writes exactly <prefix>.png
        let prefix = temp_dir.path().join("page");
        tracing::debug!(program = %self.program.display(), dpi = self.dpi, "running pdftoppm");
        let output = Command::new(&self.program)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .args(["-f", "1", "-l", "1", "-singlefile"])
            .arg(&input)
            .arg(&prefix)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => SlideSplitError::RasterizeFailed(format!(
                    "{} not found; install poppler-utils or pass its path",
                    self.program.display()
                )),
                _ => SlideSplitError::RasterizeFailed(format!(
                    "{} failed to start: {}",
                    self.program.display(),
                    e
                )),
            })?;

        if !output.status.success() {
            return Err(SlideSplitError::RasterizeFailed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let png = std::fs::read(prefix.with_extension("png")).map_err(io_err)?;
        let image = RasterImage::from_png(&png)?;
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "page rasterized"
        );
        Ok(image)
    }
}
