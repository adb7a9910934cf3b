//! Page dictionary helpers: inherited attributes and media box geometry

use crate::coords::PageSize;
use crate::error::SlideSplitError;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Page attributes a page may inherit from its ancestors in the page tree.
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Page-tree depth beyond which we assume a `Parent` cycle.
const MAX_TREE_DEPTH: usize = 64;

/// US Letter, used when no `MediaBox` is present anywhere up the tree.
pub const DEFAULT_PAGE_SIZE: PageSize = PageSize {
    x: 0.0,
    y: 0.0,
    width: 612.0,
    height: 792.0,
};

/// Look up `key` on the page, falling back to the nearest ancestor that
/// defines it.
pub fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent_id = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = doc.get_dictionary(parent_id).ok()?;
    }
    None
}

/// Copy of the page dictionary with every inheritable attribute written on
/// the page itself.
pub fn materialized_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary, SlideSplitError> {
    let mut dict = doc
        .get_dictionary(page_id)
        .map_err(|e| SlideSplitError::OperationError(format!("Page {:?}: {}", page_id, e)))?
        .clone();

    for key in INHERITABLE_KEYS {
        if !dict.has(key) {
            if let Some(value) = inherited_attribute(doc, page_id, key) {
                dict.set(key.to_vec(), value.clone());
            }
        }
    }
    Ok(dict)
}

/// Media box of a page, resolving inheritance and indirect values.
pub fn page_size(doc: &Document, page_id: ObjectId) -> Result<PageSize, SlideSplitError> {
    match inherited_attribute(doc, page_id, b"MediaBox") {
        Some(obj) => {
            let [x1, y1, x2, y2] = parse_rect(doc, obj)?;
            Ok(PageSize {
                x: x1.min(x2),
                y: y1.min(y2),
                width: (x2 - x1).abs(),
                height: (y2 - y1).abs(),
            })
        }
        None => {
            tracing::warn!(?page_id, "page has no MediaBox, assuming US Letter");
            Ok(DEFAULT_PAGE_SIZE)
        }
    }
}

/// Parse a PDF rectangle array `[x1 y1 x2 y2]`.
fn parse_rect(doc: &Document, obj: &Object) -> Result<[f64; 4], SlideSplitError> {
    let arr = match resolve(doc, obj)? {
        Object::Array(a) => a,
        _ => {
            return Err(SlideSplitError::ParseError(
                "MediaBox is not an array".to_string(),
            ))
        }
    };

    if arr.len() != 4 {
        return Err(SlideSplitError::ParseError(format!(
            "MediaBox has {} elements, expected 4",
            arr.len()
        )));
    }

    let mut values = [0.0f64; 4];
    for (slot, obj) in values.iter_mut().zip(arr) {
        *slot = extract_number(doc, obj)?;
    }
    Ok(values)
}

fn extract_number(doc: &Document, obj: &Object) -> Result<f64, SlideSplitError> {
    match resolve(doc, obj)? {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(r) => Ok(*r as f64),
        _ => Err(SlideSplitError::ParseError(
            "Expected number in rectangle".to_string(),
        )),
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, SlideSplitError> {
    match obj {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| SlideSplitError::ParseError(format!("Failed to resolve: {}", e))),
        other => Ok(other),
    }
}

/// Serialize a user-space rectangle as a PDF array.
pub fn rect_object(rect: [f64; 4]) -> Object {
    Object::Array(rect.iter().map(|&v| Object::Real(v as f32)).collect())
}
