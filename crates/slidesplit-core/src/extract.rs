//! Slide extraction
//!
//! Turns one handout page into one page per sub-slide by giving each copy its
//! own `MediaBox`. Copies share content streams and resources by reference;
//! only the page dictionary is duplicated.

use crate::coords::PdfBoundingBox;
use crate::error::SlideSplitError;
use crate::page::{materialized_page, rect_object};
use lopdf::{Document, Object, ObjectId};

/// Crop `page_id` to every box in `boxes`, returning the resulting page ids
/// in box order.
///
/// Every box but the last gets a fresh copy of the page dictionary; the last
/// one is applied to the original page object. Inherited attributes are
/// written onto each page, and any `CropBox` is dropped so the new media box
/// is the visible region.
pub fn extract(
    doc: &mut Document,
    page_id: ObjectId,
    boxes: &[PdfBoundingBox],
) -> Result<Vec<ObjectId>, SlideSplitError> {
    let Some((last, rest)) = boxes.split_last() else {
        return Err(SlideSplitError::OperationError(
            "No crop boxes to apply".into(),
        ));
    };

    let mut template = materialized_page(doc, page_id)?;
    template.remove(b"CropBox");

    let mut page_ids = Vec::with_capacity(boxes.len());
    for bbox in rest {
        let mut copy = template.clone();
        copy.set("MediaBox", rect_object(bbox.to_rect()));
        page_ids.push(doc.add_object(Object::Dictionary(copy)));
    }

    template.set("MediaBox", rect_object(last.to_rect()));
    doc.objects.insert(page_id, Object::Dictionary(template));
    page_ids.push(page_id);

    Ok(page_ids)
}

/// Apply `boxes` to every page of `doc` and rebuild the page tree in
/// page-major, slide-minor order. Returns the new page count.
pub fn extract_all(doc: &mut Document, boxes: &[PdfBoundingBox]) -> Result<usize, SlideSplitError> {
    let source_pages: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    if source_pages.is_empty() {
        return Err(SlideSplitError::EmptyDocument);
    }

    let mut page_refs = Vec::with_capacity(source_pages.len() * boxes.len());
    for (index, page_id) in source_pages.into_iter().enumerate() {
        let ids = extract(doc, page_id, boxes)?;
        tracing::debug!(page = index + 1, slides = ids.len(), "page extracted");
        page_refs.extend(ids);
    }

    update_page_tree(doc, &page_refs)?;

    // Intermediate page-tree nodes are unreachable now
    doc.prune_objects();

    Ok(page_refs.len())
}

/// Point the root page tree at `page_refs`, flattening any nested nodes.
fn update_page_tree(doc: &mut Document, page_refs: &[ObjectId]) -> Result<(), SlideSplitError> {
    let pages_id = root_pages_id(doc)?;

    if let Some(Object::Dictionary(ref mut pages_dict)) = doc.objects.get_mut(&pages_id) {
        let kids = page_refs
            .iter()
            .map(|&id| Object::Reference(id))
            .collect::<Vec<_>>();
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set("Count", Object::Integer(page_refs.len() as i64));
    } else {
        return Err(SlideSplitError::OperationError(
            "Invalid pages dictionary".into(),
        ));
    }

    for id in page_refs {
        if let Some(Object::Dictionary(ref mut page)) = doc.objects.get_mut(id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    Ok(())
}

fn root_pages_id(doc: &Document) -> Result<ObjectId, SlideSplitError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| SlideSplitError::OperationError("No Root in trailer".into()))?;

    doc.get_dictionary(catalog_id)
        .map_err(|_| SlideSplitError::OperationError("Invalid catalog".into()))?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| SlideSplitError::OperationError("No Pages in catalog".into()))
}
