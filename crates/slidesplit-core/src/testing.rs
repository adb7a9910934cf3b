//! In-memory PDF fixtures and a rectangle-only rasterizer for tests
//!
//! Fixture pages hold nothing but black filled rectangles, which
//! [`RectRasterizer`] can render exactly without poppler.

use crate::coords::PageSize;
use crate::error::SlideSplitError;
use crate::page::{page_size, rect_object};
use crate::raster::RasterImage;
use crate::rasterizer::PageRasterizer;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// One page of a fixture document.
#[derive(Debug, Clone)]
pub struct FixturePage {
    pub width: f64,
    pub height: f64,
    /// Filled rectangles as `[x y width height]` in user space
    pub rects: Vec<[f64; 4]>,
    pub crop_box: Option<[f64; 4]>,
    /// Put the page under an intermediate `Pages` node that carries its
    /// `MediaBox` and `Resources`
    pub nested: bool,
}

impl FixturePage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            rects: Vec::new(),
            crop_box: None,
            nested: false,
        }
    }

    /// Empty US Letter page.
    pub fn blank() -> Self {
        Self::new(612.0, 792.0)
    }

    /// Add a rectangle given as fractions of the page, measured from the
    /// top-left corner like a raster image.
    pub fn with_block(mut self, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let x = left * self.width;
        let y = (1.0 - bottom) * self.height;
        let w = (right - left) * self.width;
        let h = (bottom - top) * self.height;
        self.rects.push([x, y, w, h]);
        self
    }

    /// Two slides stacked: rows 10-40% and 60-90%, 5% side margins.
    pub fn stacked_handout(width: f64, height: f64) -> Self {
        Self::new(width, height)
            .with_block(0.05, 0.10, 0.95, 0.40)
            .with_block(0.05, 0.60, 0.95, 0.90)
    }

    /// Four slides in two rows of two.
    pub fn grid_handout(width: f64, height: f64) -> Self {
        Self::new(width, height)
            .with_block(0.05, 0.08, 0.47, 0.46)
            .with_block(0.53, 0.08, 0.95, 0.46)
            .with_block(0.05, 0.56, 0.47, 0.94)
            .with_block(0.53, 0.56, 0.95, 0.94)
    }

    /// Expected crop region of rectangle `index` as `[llx lly urx ury]`.
    pub fn rect_bounds(&self, index: usize) -> [f64; 4] {
        let [x, y, w, h] = self.rects[index];
        [x, y, x + w, y + h]
    }

    fn content(&self) -> Content {
        let mut operations = vec![Operation::new(
            "rg",
            vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
        )];
        for rect in &self.rects {
            operations.push(Operation::new(
                "re",
                rect.iter().map(|&v| Object::Real(v as f32)).collect(),
            ));
            operations.push(Operation::new("f", vec![]));
        }
        Content { operations }
    }
}

/// Serialize `pages` into a PDF.
pub fn build_pdf(pages: &[FixturePage]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();

    for page in pages {
        let content = page.content().encode().expect("encode fixture content");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
        let resources_id = doc.add_object(Dictionary::new());
        let media_box = rect_object([0.0, 0.0, page.width, page.height]);

        let mut page_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Contents", Object::Reference(content_id)),
        ]);
        if let Some(crop) = page.crop_box {
            page_dict.set("CropBox", rect_object(crop));
        }

        if page.nested {
            let node_id = doc.new_object_id();
            page_dict.set("Parent", Object::Reference(node_id));
            let page_id = doc.add_object(page_dict);
            let node = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                ("Kids", Object::Array(vec![Object::Reference(page_id)])),
                ("Count", Object::Integer(1)),
                ("MediaBox", media_box),
                ("Resources", Object::Reference(resources_id)),
            ]);
            doc.objects.insert(node_id, Object::Dictionary(node));
            kids.push(Object::Reference(node_id));
        } else {
            page_dict.set("Parent", Object::Reference(pages_id));
            page_dict.set("MediaBox", media_box);
            page_dict.set("Resources", Object::Reference(resources_id));
            kids.push(Object::Reference(doc.add_object(page_dict)));
        }
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(pages.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save fixture");
    buffer
}

/// A page's resolved media box as `[llx lly urx ury]`.
pub fn media_box(doc: &Document, page_id: ObjectId) -> [f64; 4] {
    let size = page_size(doc, page_id).expect("media box");
    [size.x, size.y, size.x + size.width, size.y + size.height]
}

/// Renders the first page by painting its `re`/`f` rectangles black on
/// white. Anything else in the content stream is ignored.
#[derive(Debug, Clone, Copy)]
pub struct RectRasterizer {
    pub dpi: f64,
}

impl RectRasterizer {
    pub fn new(dpi: f64) -> Self {
        Self { dpi }
    }
}

impl PageRasterizer for RectRasterizer {
    fn rasterize_first_page(&self, pdf: &[u8]) -> Result<RasterImage, SlideSplitError> {
        let doc =
            Document::load_mem(pdf).map_err(|e| SlideSplitError::ParseError(e.to_string()))?;
        let page_id = *doc
            .get_pages()
            .values()
            .next()
            .ok_or(SlideSplitError::EmptyDocument)?;
        let page: PageSize = page_size(&doc, page_id)?;

        let scale = self.dpi / 72.0;
        let width = (page.width * scale).round() as u32;
        let height = (page.height * scale).round() as u32;
        let mut image = RasterImage::solid(width, height, [255, 255, 255]);

        let bytes = doc
            .get_page_content(page_id)
            .map_err(|e| SlideSplitError::RasterizeFailed(e.to_string()))?;
        let content =
            Content::decode(&bytes).map_err(|e| SlideSplitError::RasterizeFailed(e.to_string()))?;

        let mut pending = Vec::new();
        for op in content.operations {
            match op.operator.as_str() {
                "re" => {
                    let v: Vec<f64> = op.operands.iter().filter_map(number).collect();
                    if let [x, y, w, h] = v[..] {
                        pending.push([x - page.x, y - page.y, w, h]);
                    }
                }
                "f" => {
                    for [x, y, w, h] in pending.drain(..) {
                        let x0 = (x * scale).round() as u32;
                        let x1 = ((x + w) * scale).round() as u32;
                        let y0 = ((page.height - (y + h)) * scale).round() as u32;
                        let y1 = ((page.height - y) * scale).round() as u32;
                        image = image.with_rect(x0, y0, x1, y1, [0, 0, 0]);
                    }
                }
                _ => {}
            }
        }
        Ok(image)
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}
