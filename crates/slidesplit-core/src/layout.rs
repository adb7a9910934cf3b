//! Slide layouts and the seed points each one scans from
//!
//! Seed placement is a fixed heuristic tuned to the expected handout grid.
//! Every fraction lives in a named constant so tuning one layout never
//! touches the scanner.

use crate::error::SlideSplitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How sub-slides are arranged on a handout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutFormat {
    /// Two slides, one above the other
    TwoStacked,
    /// Four slides in two rows of two
    FourSideBySide,
}

impl LayoutFormat {
    /// Number of sub-slides on each source page.
    pub fn slide_count(self) -> usize {
        match self {
            LayoutFormat::TwoStacked => 2,
            LayoutFormat::FourSideBySide => 4,
        }
    }

    /// Command-line selector for this layout.
    pub fn selector(self) -> &'static str {
        match self {
            LayoutFormat::TwoStacked => "2",
            LayoutFormat::FourSideBySide => "4sidebyside",
        }
    }
}

impl FromStr for LayoutFormat {
    type Err = SlideSplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2" => Ok(LayoutFormat::TwoStacked),
            "4sidebyside" => Ok(LayoutFormat::FourSideBySide),
            other => Err(SlideSplitError::UnsupportedLayout(other.to_string())),
        }
    }
}

impl fmt::Display for LayoutFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// Pixel coordinate a directional scan starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPoint {
    pub x: u32,
    pub y: u32,
}

impl SeedPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// The four scan origins for one sub-slide.
///
/// `top` scans down, `bottom` scans up, `left` scans right and `right`
/// scans left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSet {
    pub top: SeedPoint,
    pub bottom: SeedPoint,
    pub left: SeedPoint,
    pub right: SeedPoint,
}

/// `TwoStacked`: column the vertical scans run down.
pub const STACKED_SCAN_COLUMN: Fraction = Fraction::new(1, 2);
/// `TwoStacked`: row separating the upper and lower slide.
pub const STACKED_GUTTER_ROW: Fraction = Fraction::new(1, 2);
/// `TwoStacked`: rows the horizontal scans probe, upper then lower slide.
pub const STACKED_PROBE_ROWS: [Fraction; 2] = [Fraction::new(1, 3), Fraction::new(2, 3)];

/// `FourSideBySide`: columns the vertical scans run down, left then right slide.
pub const GRID_SCAN_COLUMNS: [Fraction; 2] = [Fraction::new(1, 4), Fraction::new(3, 4)];
/// `FourSideBySide`: column separating left and right slides.
pub const GRID_GUTTER_COLUMN: Fraction = Fraction::new(2, 4);
/// `FourSideBySide`: row separating the upper and lower row of slides.
pub const GRID_GUTTER_ROW: Fraction = Fraction::new(3, 6);
/// `FourSideBySide`: rows the horizontal scans probe. The upper row sits
/// between 1/6 and 3/6 of the page, the lower row between 4/7 and 6/7.
pub const GRID_PROBE_ROWS: [Fraction; 2] = [Fraction::new(2, 6), Fraction::new(5, 7)];

/// Exact ratio applied to an image extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    pub num: u32,
    pub den: u32,
}

impl Fraction {
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// `floor(extent * num / den)`, clamped to the last valid index.
    pub fn of(self, extent: u32) -> u32 {
        let v = (extent as u64 * self.num as u64 / self.den as u64) as u32;
        v.min(extent.saturating_sub(1))
    }
}

/// Seed sets for every sub-slide of `layout`, in output order.
///
/// `TwoStacked` yields upper then lower. `FourSideBySide` yields upper-left,
/// upper-right, lower-left, lower-right. Both dimensions must be non-zero.
pub fn seed_sets(
    layout: LayoutFormat,
    width: u32,
    height: u32,
) -> Result<Vec<SeedSet>, SlideSplitError> {
    if width == 0 || height == 0 {
        return Err(SlideSplitError::DimensionMismatch(format!(
            "cannot seed a {}x{} image",
            width, height
        )));
    }

    let last_x = width - 1;
    let last_y = height - 1;

    let sets: Vec<SeedSet> = match layout {
        LayoutFormat::TwoStacked => {
            let column = STACKED_SCAN_COLUMN.of(width);
            let gutter = STACKED_GUTTER_ROW.of(height);
            let rows = [(0, gutter), (gutter, last_y)];

            rows.iter()
                .zip(STACKED_PROBE_ROWS.iter())
                .map(|(&(row_top, row_bottom), probe)| {
                    let probe = probe.of(height);
                    SeedSet {
                        top: SeedPoint::new(column, row_top),
                        bottom: SeedPoint::new(column, row_bottom),
                        left: SeedPoint::new(0, probe),
                        right: SeedPoint::new(last_x, probe),
                    }
                })
                .collect()
        }
        LayoutFormat::FourSideBySide => {
            let gutter_x = GRID_GUTTER_COLUMN.of(width);
            let gutter_y = GRID_GUTTER_ROW.of(height);
            let rows = [(0, gutter_y), (gutter_y, last_y)];
            let columns = [(0, gutter_x), (gutter_x, last_x)];

            let mut sets = Vec::with_capacity(4);
            for (&(row_top, row_bottom), probe) in rows.iter().zip(GRID_PROBE_ROWS.iter()) {
                let probe = probe.of(height);
                for (&(col_left, col_right), scan_col) in
                    columns.iter().zip(GRID_SCAN_COLUMNS.iter())
                {
                    let scan_col = scan_col.of(width);
                    sets.push(SeedSet {
                        top: SeedPoint::new(scan_col, row_top),
                        bottom: SeedPoint::new(scan_col, row_bottom),
                        left: SeedPoint::new(col_left, probe),
                        right: SeedPoint::new(col_right, probe),
                    });
                }
            }
            sets
        }
    };

    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_selectors() {
        assert_eq!("2".parse::<LayoutFormat>().unwrap(), LayoutFormat::TwoStacked);
        assert_eq!(
            "4sidebyside".parse::<LayoutFormat>().unwrap(),
            LayoutFormat::FourSideBySide
        );
    }

    #[test]
    fn test_unknown_selector_is_unsupported() {
        for bad in ["3", "4", "", "two", "4SideBySide"] {
            let err = bad.parse::<LayoutFormat>().unwrap_err();
            assert!(
                matches!(err, SlideSplitError::UnsupportedLayout(_)),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_display_round_trips_selector() {
        for layout in [LayoutFormat::TwoStacked, LayoutFormat::FourSideBySide] {
            assert_eq!(layout.to_string().parse::<LayoutFormat>().unwrap(), layout);
        }
    }

    #[test]
    fn test_fraction_of() {
        assert_eq!(Fraction::new(1, 3).of(900), 300);
        assert_eq!(Fraction::new(5, 7).of(700), 500);
        assert_eq!(Fraction::new(1, 2).of(1001), 500);
        // Never past the last index
        assert_eq!(Fraction::new(1, 1).of(10), 9);
    }

    #[test]
    fn test_two_stacked_seed_sets() {
        let sets = seed_sets(LayoutFormat::TwoStacked, 600, 900).unwrap();
        assert_eq!(sets.len(), 2);

        assert_eq!(
            sets[0],
            SeedSet {
                top: SeedPoint::new(300, 0),
                bottom: SeedPoint::new(300, 450),
                left: SeedPoint::new(0, 300),
                right: SeedPoint::new(599, 300),
            }
        );
        assert_eq!(
            sets[1],
            SeedSet {
                top: SeedPoint::new(300, 450),
                bottom: SeedPoint::new(300, 899),
                left: SeedPoint::new(0, 600),
                right: SeedPoint::new(599, 600),
            }
        );
    }

    #[test]
    fn test_four_side_by_side_seed_sets() {
        let sets = seed_sets(LayoutFormat::FourSideBySide, 800, 840).unwrap();
        assert_eq!(sets.len(), 4);

        // upper-left
        assert_eq!(sets[0].top, SeedPoint::new(200, 0));
        assert_eq!(sets[0].bottom, SeedPoint::new(200, 420));
        assert_eq!(sets[0].left, SeedPoint::new(0, 280));
        assert_eq!(sets[0].right, SeedPoint::new(400, 280));
        // upper-right
        assert_eq!(sets[1].top, SeedPoint::new(600, 0));
        assert_eq!(sets[1].left, SeedPoint::new(400, 280));
        assert_eq!(sets[1].right, SeedPoint::new(799, 280));
        // lower-left
        assert_eq!(sets[2].top, SeedPoint::new(200, 420));
        assert_eq!(sets[2].bottom, SeedPoint::new(200, 839));
        assert_eq!(sets[2].left, SeedPoint::new(0, 600));
        // lower-right
        assert_eq!(sets[3].right, SeedPoint::new(799, 600));
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        assert!(matches!(
            seed_sets(LayoutFormat::TwoStacked, 0, 100),
            Err(SlideSplitError::DimensionMismatch(_))
        ));
        assert!(matches!(
            seed_sets(LayoutFormat::FourSideBySide, 100, 0),
            Err(SlideSplitError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_one_pixel_image_seeds_stay_in_bounds() {
        for layout in [LayoutFormat::TwoStacked, LayoutFormat::FourSideBySide] {
            for set in seed_sets(layout, 1, 1).unwrap() {
                for p in [set.top, set.bottom, set.left, set.right] {
                    assert_eq!(p, SeedPoint::new(0, 0));
                }
            }
        }
    }
}
