//! Pixel space to PDF user space
//!
//! Raster images measure `y` down from the top-left corner; PDF user space
//! measures `y` up from the bottom-left corner of the media box.

use crate::error::SlideSplitError;
use crate::raster::ImageSize;
use crate::scan::PixelBoundingBox;
use serde::{Deserialize, Serialize};

/// Media box of a source page in user-space units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Lower-left corner of the media box
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// A media box anchored at the origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }
}

/// Crop region in PDF user space, bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdfBoundingBox {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl PdfBoundingBox {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// `[llx lly urx ury]` as written to a `MediaBox`.
    pub fn to_rect(&self) -> [f64; 4] {
        [self.left, self.bottom, self.right, self.top]
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Map pixel boxes onto the page, preserving order.
///
/// Scale factors are `page / image` per axis. Zero-sized images or pages are
/// [`SlideSplitError::DimensionMismatch`]; a mapped box with no area is
/// [`SlideSplitError::DegenerateBox`].
pub fn to_pdf_space(
    pixel_boxes: &[PixelBoundingBox],
    image: ImageSize,
    page: PageSize,
) -> Result<Vec<PdfBoundingBox>, SlideSplitError> {
    if image.width == 0 || image.height == 0 {
        return Err(SlideSplitError::DimensionMismatch(format!(
            "image is {}x{} pixels",
            image.width, image.height
        )));
    }
    if !(page.width > 0.0 && page.height > 0.0) {
        return Err(SlideSplitError::DimensionMismatch(format!(
            "page is {}x{} units",
            page.width, page.height
        )));
    }

    let scale_x = page.width / image.width as f64;
    let scale_y = page.height / image.height as f64;
    tracing::debug!(scale_x, scale_y, "pixel to user space scale");

    pixel_boxes
        .iter()
        .enumerate()
        .map(|(slide, px)| {
            let pdf = PdfBoundingBox {
                top: page.y + round2(page.height - px.top as f64 * scale_y),
                bottom: page.y + round2(page.height - px.bottom as f64 * scale_y),
                left: page.x + round2(px.left as f64 * scale_x),
                right: page.x + round2(px.right as f64 * scale_x),
            };

            if pdf.top <= pdf.bottom || pdf.right <= pdf.left {
                return Err(SlideSplitError::DegenerateBox {
                    slide,
                    detail: format!(
                        "mapped to [{} {} {} {}]",
                        pdf.left, pdf.bottom, pdf.right, pdf.top
                    ),
                });
            }
            Ok(pdf)
        })
        .collect()
}
