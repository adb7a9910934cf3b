//! Split N-up slide handouts into one PDF page per slide
//!
//! The first page is rasterized once; sub-slide bounds are found by scanning
//! from fixed seed points toward the slide content, mapped into PDF user
//! space, and applied as the `MediaBox` of one page copy per sub-slide on
//! every page of the document.
//!
//! Pipeline stages:
//! - `layout`: seed points per layout format
//! - `scan`: directional content scans over a `RasterImage`
//! - `coords`: pixel space to PDF user space
//! - `extract`: page copies with independent media boxes (lopdf)

pub mod coords;
pub mod error;
pub mod extract;
pub mod layout;
pub mod page;
pub mod pipeline;
pub mod raster;
pub mod rasterizer;
pub mod scan;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use coords::{to_pdf_space, PageSize, PdfBoundingBox};
pub use error::SlideSplitError;
pub use extract::{extract, extract_all};
pub use layout::{seed_sets, LayoutFormat, SeedPoint, SeedSet};
pub use pipeline::{detect_crop_boxes, split_slides, CropPlan, SplitMetrics, SplitOptions, SplitOutput};
pub use raster::{is_content, ImageSize, PixelClassifier, RasterImage};
pub use rasterizer::{PageRasterizer, PdftoppmRasterizer};
pub use scan::{scan_all, scan_bounding_box, Edge, PixelBoundingBox};
