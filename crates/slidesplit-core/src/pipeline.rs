//! End-to-end split: detect crop boxes on page 1, apply them to every page

use crate::coords::{to_pdf_space, PageSize, PdfBoundingBox};
use crate::error::SlideSplitError;
use crate::extract::extract_all;
use crate::layout::{seed_sets, LayoutFormat};
use crate::page::{inherited_attribute, page_size};
use crate::raster::{ImageSize, PixelClassifier};
use crate::rasterizer::PageRasterizer;
use crate::scan::{scan_all, PixelBoundingBox};
use lopdf::{Document, Object};
use serde::Serialize;
use std::time::Instant;

/// Tunables for boundary detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitOptions {
    pub classifier: PixelClassifier,
}

/// Crop boxes detected on the first page, reused for every page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropPlan {
    pub layout: LayoutFormat,
    pub image: ImageSize,
    pub page: PageSize,
    pub pixel_boxes: Vec<PixelBoundingBox>,
    pub boxes: Vec<PdfBoundingBox>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitMetrics {
    pub input_size_bytes: usize,
    pub output_size_bytes: usize,
    pub input_page_count: usize,
    pub output_page_count: usize,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone)]
pub struct SplitOutput {
    /// Serialized output PDF
    pub bytes: Vec<u8>,
    pub plan: CropPlan,
    pub metrics: SplitMetrics,
}

/// Detect the crop boxes for `layout` from the first page of `bytes`.
pub fn detect_crop_boxes<R: PageRasterizer>(
    bytes: &[u8],
    layout: LayoutFormat,
    rasterizer: &R,
    options: &SplitOptions,
) -> Result<CropPlan, SlideSplitError> {
    let doc = load(bytes)?;
    plan_for_document(&doc, bytes, layout, rasterizer, options)
}

/// Split every page of `bytes` into one page per sub-slide.
///
/// Nothing is serialized unless detection succeeded for every sub-slide.
pub fn split_slides<R: PageRasterizer>(
    bytes: &[u8],
    layout: LayoutFormat,
    rasterizer: &R,
    options: &SplitOptions,
) -> Result<SplitOutput, SlideSplitError> {
    let start = Instant::now();

    let mut doc = load(bytes)?;
    let input_page_count = doc.get_pages().len();
    let plan = plan_for_document(&doc, bytes, layout, rasterizer, options)?;

    let output_page_count = extract_all(&mut doc, &plan.boxes)?;
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| SlideSplitError::OperationError(format!("Save failed: {}", e)))?;

    let metrics = SplitMetrics {
        input_size_bytes: bytes.len(),
        output_size_bytes: buffer.len(),
        input_page_count,
        output_page_count,
        processing_time_ms: start.elapsed().as_millis() as u64,
    };
    tracing::info!(
        input_pages = input_page_count,
        output_pages = output_page_count,
        ms = metrics.processing_time_ms,
        "split complete"
    );

    Ok(SplitOutput {
        bytes: buffer,
        plan,
        metrics,
    })
}

fn load(bytes: &[u8]) -> Result<Document, SlideSplitError> {
    let doc = Document::load_mem(bytes).map_err(|e| SlideSplitError::ParseError(e.to_string()))?;
    if doc.get_pages().is_empty() {
        return Err(SlideSplitError::EmptyDocument);
    }
    Ok(doc)
}

fn plan_for_document<R: PageRasterizer>(
    doc: &Document,
    bytes: &[u8],
    layout: LayoutFormat,
    rasterizer: &R,
    options: &SplitOptions,
) -> Result<CropPlan, SlideSplitError> {
    let first_page = *doc
        .get_pages()
        .values()
        .next()
        .ok_or(SlideSplitError::EmptyDocument)?;

    let page = page_size(doc, first_page)?;
    if let Some(Object::Integer(rotate)) = inherited_attribute(doc, first_page, b"Rotate") {
        if rotate % 360 != 0 {
            tracing::warn!(rotate, "first page is rotated; crop boxes assume an upright page");
        }
    }

    let image = rasterizer.rasterize_first_page(bytes)?;
    let image_size = image.size();
    tracing::info!(
        %layout,
        image_width = image_size.width,
        image_height = image_size.height,
        page_width = page.width,
        page_height = page.height,
        "detecting slide boundaries"
    );

    let seeds = seed_sets(layout, image_size.width, image_size.height)?;
    let pixel_boxes = scan_all(&image, &seeds, &options.classifier)?;
    let boxes = to_pdf_space(&pixel_boxes, image_size, page)?;

    debug_assert_eq!(boxes.len(), layout.slide_count());

    for (slide, b) in boxes.iter().enumerate() {
        tracing::debug!(
            slide,
            left = b.left,
            bottom = b.bottom,
            right = b.right,
            top = b.top,
            "crop box"
        );
    }

    Ok(CropPlan {
        layout,
        image: image_size,
        page,
        pixel_boxes,
        boxes,
    })
}
