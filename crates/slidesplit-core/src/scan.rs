//! Directional boundary scans
//!
//! Each seed is walked one pixel at a time toward the image edge until the
//! classifier reports content. Four such walks make one bounding box.

use crate::error::SlideSplitError;
use crate::layout::{SeedPoint, SeedSet};
use crate::raster::{PixelClassifier, RasterImage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a sub-slide a scan is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        };
        f.write_str(name)
    }
}

/// Content bounds in pixels, top-left origin, edges inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBoundingBox {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// Walk from `seed` in the direction that finds `edge`.
///
/// Returns the first content coordinate on the scanned axis, or `None` when
/// the walk reaches the image edge without finding any.
pub fn scan_edge(
    image: &RasterImage,
    classifier: &PixelClassifier,
    seed: SeedPoint,
    edge: Edge,
) -> Option<u32> {
    let (width, height) = (image.width(), image.height());
    if seed.x >= width || seed.y >= height {
        return None;
    }

    match edge {
        Edge::Top => (seed.y..height).find(|&y| classifier.is_content(image, seed.x, y)),
        Edge::Bottom => (0..=seed.y)
            .rev()
            .find(|&y| classifier.is_content(image, seed.x, y)),
        Edge::Left => (seed.x..width).find(|&x| classifier.is_content(image, x, seed.y)),
        Edge::Right => (0..=seed.x)
            .rev()
            .find(|&x| classifier.is_content(image, x, seed.y)),
    }
}

/// Scan all four edges of one sub-slide.
///
/// `slide` is the sub-slide's index, used only for error reporting. A scan
/// that finds nothing is [`SlideSplitError::BoundaryNotFound`]; edges that
/// cross each other are [`SlideSplitError::DegenerateBox`].
pub fn scan_bounding_box(
    image: &RasterImage,
    seeds: &SeedSet,
    classifier: &PixelClassifier,
    slide: usize,
) -> Result<PixelBoundingBox, SlideSplitError> {
    let find = |seed: SeedPoint, edge: Edge| {
        let found = scan_edge(image, classifier, seed, edge);
        tracing::debug!(slide, %edge, x = seed.x, y = seed.y, ?found, "edge scan");
        found.ok_or(SlideSplitError::BoundaryNotFound { slide, edge })
    };

    let bbox = PixelBoundingBox {
        top: find(seeds.top, Edge::Top)?,
        bottom: find(seeds.bottom, Edge::Bottom)?,
        left: find(seeds.left, Edge::Left)?,
        right: find(seeds.right, Edge::Right)?,
    };

    if bbox.top > bbox.bottom || bbox.left > bbox.right {
        return Err(SlideSplitError::DegenerateBox {
            slide,
            detail: format!(
                "pixel edges cross (top {}, bottom {}, left {}, right {})",
                bbox.top, bbox.bottom, bbox.left, bbox.right
            ),
        });
    }

    Ok(bbox)
}

/// Scan every seed set, returning boxes in seed order.
#[cfg(not(feature = "parallel"))]
pub fn scan_all(
    image: &RasterImage,
    seed_sets: &[SeedSet],
    classifier: &PixelClassifier,
) -> Result<Vec<PixelBoundingBox>, SlideSplitError> {
    seed_sets
        .iter()
        .enumerate()
        .map(|(slide, seeds)| scan_bounding_box(image, seeds, classifier, slide))
        .collect()
}

/// Scan every seed set on the rayon pool, returning boxes in seed order.
///
/// Scans only read the image, so sub-slides are independent.
#[cfg(feature = "parallel")]
pub fn scan_all(
    image: &RasterImage,
    seed_sets: &[SeedSet],
    classifier: &PixelClassifier,
) -> Result<Vec<PixelBoundingBox>, SlideSplitError> {
    use rayon::prelude::*;

    seed_sets
        .par_iter()
        .enumerate()
        .map(|(slide, seeds)| scan_bounding_box(image, seeds, classifier, slide))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{seed_sets, LayoutFormat};
    use pretty_assertions::assert_eq;

    const WHITE: [u8; 3] = [255, 255, 255];
    const BLACK: [u8; 3] = [0, 0, 0];

    fn exact() -> PixelClassifier {
        PixelClassifier::default()
    }

    #[test]
    fn test_scan_includes_seed_pixel() {
        let img = RasterImage::solid(5, 5, BLACK);
        let seed = SeedPoint::new(2, 2);
        assert_eq!(scan_edge(&img, &exact(), seed, Edge::Top), Some(2));
        assert_eq!(scan_edge(&img, &exact(), seed, Edge::Bottom), Some(2));
        assert_eq!(scan_edge(&img, &exact(), seed, Edge::Left), Some(2));
        assert_eq!(scan_edge(&img, &exact(), seed, Edge::Right), Some(2));
    }

    #[test]
    fn test_scan_directions() {
        // Content occupies x in [3, 7), y in [2, 8)
        let img = RasterImage::solid(10, 10, WHITE).with_rect(3, 2, 7, 8, BLACK);
        let c = exact();
        assert_eq!(scan_edge(&img, &c, SeedPoint::new(5, 0), Edge::Top), Some(2));
        assert_eq!(scan_edge(&img, &c, SeedPoint::new(5, 9), Edge::Bottom), Some(7));
        assert_eq!(scan_edge(&img, &c, SeedPoint::new(0, 5), Edge::Left), Some(3));
        assert_eq!(scan_edge(&img, &c, SeedPoint::new(9, 5), Edge::Right), Some(6));
    }

    #[test]
    fn test_scan_exhausted_is_none() {
        let img = RasterImage::solid(4, 4, WHITE);
        for edge in [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right] {
            assert_eq!(scan_edge(&img, &exact(), SeedPoint::new(1, 1), edge), None);
        }
    }

    #[test]
    fn test_scan_does_not_look_behind_seed() {
        // Content only above the seed; a downward scan must miss it
        let img = RasterImage::solid(4, 10, WHITE).with_rect(0, 0, 4, 2, BLACK);
        assert_eq!(scan_edge(&img, &exact(), SeedPoint::new(1, 5), Edge::Top), None);
    }

    #[test]
    fn test_seed_inside_content_reports_its_own_row() {
        // Upper-left slide of a 2x2 handout spans rows 48..276. A top seed at
        // 1/6 of the height lands inside it and stops immediately, so the grid
        // seeds start their downward scan from the page edge instead.
        let img = RasterImage::solid(400, 600, WHITE).with_rect(20, 48, 188, 276, BLACK);
        let inside = SeedPoint::new(100, 100);
        assert_eq!(scan_edge(&img, &exact(), inside, Edge::Top), Some(100));

        let sets = seed_sets(LayoutFormat::FourSideBySide, 400, 600).unwrap();
        assert_eq!(scan_edge(&img, &exact(), sets[0].top, Edge::Top), Some(48));
    }

    #[test]
    fn test_out_of_bounds_seed_is_none() {
        let img = RasterImage::solid(4, 4, BLACK);
        assert_eq!(scan_edge(&img, &exact(), SeedPoint::new(4, 0), Edge::Top), None);
    }

    #[test]
    fn test_bounding_box_of_centered_rect() {
        let img = RasterImage::solid(100, 100, WHITE).with_rect(10, 20, 90, 45, BLACK);
        let seeds = SeedSet {
            top: SeedPoint::new(50, 0),
            bottom: SeedPoint::new(50, 50),
            left: SeedPoint::new(0, 30),
            right: SeedPoint::new(99, 30),
        };
        let bbox = scan_bounding_box(&img, &seeds, &exact(), 0).unwrap();
        assert_eq!(
            bbox,
            PixelBoundingBox {
                top: 20,
                bottom: 44,
                left: 10,
                right: 89,
            }
        );
    }

    #[test]
    fn test_missing_edge_reports_slide_and_edge() {
        // Only a vertical bar down the scan column: top/bottom hit, left misses
        // on the probe row because the bar sits below it.
        let img = RasterImage::solid(100, 100, WHITE).with_rect(50, 60, 51, 70, BLACK);
        let seeds = SeedSet {
            top: SeedPoint::new(50, 0),
            bottom: SeedPoint::new(50, 99),
            left: SeedPoint::new(0, 30),
            right: SeedPoint::new(99, 30),
        };
        let err = scan_bounding_box(&img, &seeds, &exact(), 3).unwrap_err();
        assert!(matches!(
            err,
            SlideSplitError::BoundaryNotFound {
                slide: 3,
                edge: Edge::Left
            }
        ));
    }

    #[test]
    fn test_crossed_edges_are_degenerate() {
        // Bottom seed sits above the content, so its upward scan finds
        // nothing below the top hit.
        let img = RasterImage::solid(20, 20, WHITE)
            .with_rect(0, 2, 20, 3, BLACK)
            .with_rect(0, 15, 20, 16, BLACK);
        let seeds = SeedSet {
            top: SeedPoint::new(10, 5),
            bottom: SeedPoint::new(10, 10),
            left: SeedPoint::new(0, 15),
            right: SeedPoint::new(19, 15),
        };
        let err = scan_bounding_box(&img, &seeds, &exact(), 0).unwrap_err();
        assert!(matches!(err, SlideSplitError::DegenerateBox { slide: 0, .. }));
    }

    #[test]
    fn test_all_white_page_fails_every_slide() {
        let img = RasterImage::solid(60, 90, WHITE);
        for layout in [LayoutFormat::TwoStacked, LayoutFormat::FourSideBySide] {
            let sets = seed_sets(layout, img.width(), img.height()).unwrap();
            for (slide, seeds) in sets.iter().enumerate() {
                for (seed, edge) in [
                    (seeds.top, Edge::Top),
                    (seeds.bottom, Edge::Bottom),
                    (seeds.left, Edge::Left),
                    (seeds.right, Edge::Right),
                ] {
                    assert_eq!(scan_edge(&img, &exact(), seed, edge), None);
                }
                assert!(matches!(
                    scan_bounding_box(&img, seeds, &exact(), slide),
                    Err(SlideSplitError::BoundaryNotFound { .. })
                ));
            }
            assert!(scan_all(&img, &sets, &exact()).is_err());
        }
    }

    #[test]
    fn test_scan_all_stacked_page() {
        // 200x400 page, slides at rows [40, 160) and [240, 360), 10px margins
        let img = RasterImage::solid(200, 400, WHITE)
            .with_rect(10, 40, 190, 160, BLACK)
            .with_rect(10, 240, 190, 360, BLACK);
        let sets = seed_sets(LayoutFormat::TwoStacked, 200, 400).unwrap();
        let boxes = scan_all(&img, &sets, &exact()).unwrap();
        assert_eq!(
            boxes,
            vec![
                PixelBoundingBox {
                    top: 40,
                    bottom: 159,
                    left: 10,
                    right: 189,
                },
                PixelBoundingBox {
                    top: 240,
                    bottom: 359,
                    left: 10,
                    right: 189,
                },
            ]
        );
    }

    #[test]
    fn test_scan_all_grid_page() {
        // 400x420: rows [20, 190) and [250, 400), columns [20, 190) and [210, 380)
        let mut img = RasterImage::solid(400, 420, WHITE);
        for (y0, y1) in [(20, 190), (250, 400)] {
            for (x0, x1) in [(20, 190), (210, 380)] {
                img = img.with_rect(x0, y0, x1, y1, BLACK);
            }
        }
        let sets = seed_sets(LayoutFormat::FourSideBySide, 400, 420).unwrap();
        let boxes = scan_all(&img, &sets, &exact()).unwrap();

        assert_eq!(boxes.len(), 4);
        assert_eq!((boxes[0].top, boxes[0].bottom), (20, 189));
        assert_eq!((boxes[0].left, boxes[0].right), (20, 189));
        assert_eq!((boxes[1].left, boxes[1].right), (210, 379));
        assert_eq!((boxes[2].top, boxes[2].bottom), (250, 399));
        assert_eq!((boxes[3].left, boxes[3].right), (210, 379));
        assert_eq!((boxes[3].top, boxes[3].bottom), (250, 399));
    }

    #[test]
    fn test_edge_display() {
        assert_eq!(Edge::Top.to_string(), "top");
        assert_eq!(Edge::Right.to_string(), "right");
    }
}
