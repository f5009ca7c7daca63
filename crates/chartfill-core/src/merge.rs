//! Composite a rendered overlay onto the uploaded template.
//!
//! Stamping works directly on the template document: each covered page
//! gets its existing content wrapped in `q`/`Q` (so the template's
//! graphics state cannot leak into the overlay), the overlay stream
//! appended, and the shared Helvetica font registered in its resources.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::error::FillError;
use crate::overlay::{Overlay, OVERLAY_FONT_NAME};

/// Merge overlay pages onto the template, page-for-page in page order.
///
/// Zip-shortest semantics: with a single-page overlay only the first
/// template page is stamped and the rest pass through unchanged.
/// Returns the bytes of the composed document.
pub fn merge_overlay(template_bytes: &[u8], overlay: &Overlay) -> Result<Vec<u8>, FillError> {
    let mut doc = Document::load_mem(template_bytes).map_err(|e| FillError::TemplateUnreadable {
        reason: e.to_string(),
    })?;

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    for (page_id, content) in page_ids.iter().zip(&overlay.pages) {
        stamp_page(&mut doc, *page_id, content, font_id)?;
    }

    doc.compress();
    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    ops: &[u8],
    font_id: ObjectId,
) -> Result<(), FillError> {
    register_overlay_font(doc, page_id, font_id)?;

    let guard_id = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
    let mut overlay_ops = b"Q\n".to_vec();
    overlay_ops.extend_from_slice(ops);
    let overlay_id = doc.add_object(Stream::new(dictionary! {}, overlay_ops));

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    let mut contents = vec![Object::Reference(guard_id)];
    match page.get(b"Contents") {
        Ok(Object::Reference(existing)) => contents.push(Object::Reference(*existing)),
        Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
        Ok(other) => contents.push(other.clone()),
        Err(_) => {}
    }
    contents.push(Object::Reference(overlay_id));
    page.set("Contents", Object::Array(contents));
    Ok(())
}

/// Put the overlay font into the page's `/Font` resources without
/// clobbering anything the template brought along. Inherited resources
/// are copied down onto the page first, since the stamped page now needs
/// its own entry.
fn register_overlay_font(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
) -> Result<(), FillError> {
    let mut resources = match effective_resources(doc, page_id)? {
        Some(existing) => existing.clone(),
        None => Dictionary::new(),
    };

    let mut fonts = match resources.get(b"Font") {
        Ok(Object::Dictionary(d)) => d.clone(),
        Ok(Object::Reference(id)) => doc.get_object(*id)?.as_dict()?.clone(),
        _ => Dictionary::new(),
    };
    fonts.set(OVERLAY_FONT_NAME, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Resolve the resources a page actually sees: its own entry if present,
/// otherwise the nearest ancestor's in the page tree.
fn effective_resources<'a>(
    doc: &'a Document,
    page_id: ObjectId,
) -> Result<Option<&'a Dictionary>, FillError> {
    let mut current = page_id;
    loop {
        let dict = doc.get_object(current)?.as_dict()?;
        match dict.get(b"Resources") {
            Ok(Object::Dictionary(d)) => return Ok(Some(d)),
            Ok(Object::Reference(id)) => return Ok(Some(doc.get_object(*id)?.as_dict()?)),
            _ => {}
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(id)) => current = *id,
            _ => return Ok(None),
        }
    }
}
