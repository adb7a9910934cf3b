use crate::scan::Edge;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlideSplitError {
    #[error("Unsupported layout format: {0} (expected \"2\" or \"4sidebyside\")")]
    UnsupportedLayout(String),

    #[error("No content found scanning the {edge} edge of slide {slide}")]
    BoundaryNotFound { slide: usize, edge: Edge },

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Slide {slide} has an empty crop region: {detail}")]
    DegenerateBox { slide: usize, detail: String },

    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("PDF has no pages")]
    EmptyDocument,

    #[error("Failed to rasterize page: {0}")]
    RasterizeFailed(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),
}
