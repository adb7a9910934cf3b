//! Raster images and the content/background pixel rule
//!
//! A [`RasterImage`] is the rendered form of one PDF page. Rows run top to
//! bottom, so `y` grows downward, unlike PDF user space.

use crate::error::SlideSplitError;
use serde::{Deserialize, Serialize};

/// Maximum value of an 8-bit channel; a pixel with every channel at this
/// value is background.
pub const WHITE: u8 = 255;

/// Width and height of a raster image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Immutable RGB8 pixel grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    /// Packed RGB triples, row-major
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap a packed RGB8 buffer. The buffer length must be `width * height * 3`.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SlideSplitError> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(SlideSplitError::DimensionMismatch(format!(
                "RGB buffer has {} bytes, expected {} for {}x{}",
                pixels.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A single-colour image.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Return a copy with the half-open rectangle `[x0, x1) x [y0, y1)` painted
    /// in `rgb`. Coordinates are clamped to the image.
    pub fn with_rect(mut self, x0: u32, y0: u32, x1: u32, y1: u32, rgb: [u8; 3]) -> Self {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0.min(y1)..y1 {
            for x in x0.min(x1)..x1 {
                let i = self.offset(x, y);
                self.pixels[i..i + 3].copy_from_slice(&rgb);
            }
        }
        self
    }

    /// Decode a PNG byte stream. Palette, 16-bit and grayscale images are
    /// normalised to RGB8; alpha is dropped.
    pub fn from_png(bytes: &[u8]) -> Result<Self, SlideSplitError> {
        let mut decoder = png::Decoder::new(bytes);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let mut reader = decoder
            .read_info()
            .map_err(|e| SlideSplitError::RasterizeFailed(format!("PNG header: {}", e)))?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e| SlideSplitError::RasterizeFailed(format!("PNG data: {}", e)))?;
        let data = &buf[..info.buffer_size()];

        let channels = match info.color_type {
            png::ColorType::Rgb => 3,
            png::ColorType::Rgba => 4,
            png::ColorType::Grayscale => 1,
            png::ColorType::GrayscaleAlpha => 2,
            other => {
                return Err(SlideSplitError::RasterizeFailed(format!(
                    "Unsupported PNG color type {:?}",
                    other
                )))
            }
        };

        let pixel_count = info.width as usize * info.height as usize;
        let mut pixels = Vec::with_capacity(pixel_count * 3);
        // Rows may carry padding beyond width * channels
        for row in data.chunks(info.line_size).take(info.height as usize) {
            for px in row[..info.width as usize * channels].chunks_exact(channels) {
                match channels {
                    1 | 2 => pixels.extend_from_slice(&[px[0], px[0], px[0]]),
                    _ => pixels.extend_from_slice(&px[..3]),
                }
            }
        }

        Self::from_rgb(info.width, info.height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }

    /// RGB sample at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} image",
            x,
            y,
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * 3
    }
}

/// Content/background rule.
///
/// A pixel is content when any channel is below `255 - tolerance`. With the
/// default tolerance of zero only pure white counts as background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelClassifier {
    pub tolerance: u8,
}

impl PixelClassifier {
    pub fn new(tolerance: u8) -> Self {
        Self { tolerance }
    }

    pub fn is_content(&self, image: &RasterImage, x: u32, y: u32) -> bool {
        let threshold = WHITE - self.tolerance;
        image.pixel(x, y).iter().any(|&c| c < threshold)
    }
}

/// Exact rule: content iff the pixel is not pure white.
pub fn is_content(image: &RasterImage, x: u32, y: u32) -> bool {
    PixelClassifier::default().is_content(image, x, y)
}
