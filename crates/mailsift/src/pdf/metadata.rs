//! Structural facts about a document, read with `lopdf` without rendering.

use super::error::PdfError;
use crate::types::DocumentInfo;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Pages inspected for embedded images.
const IMAGE_PROBE_PAGES: usize = 3;

/// Open `bytes` and report page count, encryption, image presence and the
/// info-dictionary title and author.
pub fn probe(bytes: &[u8]) -> Result<DocumentInfo, PdfError> {
    let doc = Document::load_mem(bytes)?;
    let pages = doc.get_pages();

    let has_images = pages
        .values()
        .take(IMAGE_PROBE_PAGES)
        .any(|page_id| page_has_image(&doc, *page_id));

    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| resolve_object(&doc, obj).as_dict().ok());

    Ok(DocumentInfo {
        page_count: pages.len(),
        encrypted: doc.is_encrypted(),
        has_images,
        title: info.and_then(|dict| text_entry(dict, b"Title")),
        author: info.and_then(|dict| text_entry(dict, b"Author")),
    })
}

fn resolve_object<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn resolve_dict_entry<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Dictionary> {
    dict.get(key).ok().and_then(|obj| resolve_object(doc, obj).as_dict().ok())
}

fn is_image_subtype(dict: &Dictionary) -> bool {
    dict.get(b"Subtype")
        .map(|obj| matches!(obj, Object::Name(name) if name == b"Image"))
        .unwrap_or(false)
}

fn page_has_image(doc: &Document, page_id: ObjectId) -> bool {
    let Some(page) = doc.get_object(page_id).ok().and_then(|obj| obj.as_dict().ok()) else {
        return false;
    };
    let Some(xobjects) =
        resolve_dict_entry(doc, page, b"Resources").and_then(|resources| resolve_dict_entry(doc, resources, b"XObject"))
    else {
        return false;
    };

    xobjects.iter().any(|(_, obj)| match resolve_object(doc, obj) {
        Object::Stream(stream) => is_image_subtype(&stream.dict),
        _ => false,
    })
}

/// Decode a PDF text string: UTF-16BE with a byte-order mark, otherwise
/// PDFDocEncoding (read as Latin-1).
fn text_entry(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let Ok(Object::String(bytes, _)) = dict.get(key) else {
        return None;
    };

    let text = if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    };

    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}
