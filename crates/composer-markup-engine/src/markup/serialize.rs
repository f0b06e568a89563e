//! Marker splicing: tag-free text plus markers back to markup.

use super::{
    document::{Document, PLACEHOLDER, PLACEHOLDER_STR},
    edit::Edit,
    marker::MarkerRole,
    tags::{TagKind, attribute, is_image},
};

/// Replaces every image marker with its `alt` text.
///
/// Markers sharing the image's offset keep their document order: those
/// recorded before the image stay in front of the alt text, those after it
/// move behind. A caret at the image offset ends up after the alt text.
pub fn degrade_images(mut doc: Document) -> Document {
    while let Some(idx) = doc.markers.iter().rposition(|m| is_image(&m.tag)) {
        let image = doc.markers.remove(idx);
        let alt = attribute(&image.tag, "alt").unwrap_or_default();
        if alt.is_empty() {
            continue;
        }
        let at = image.position;
        let behind: Vec<usize> = (idx..doc.markers.len())
            .filter(|&i| doc.markers[i].position == at)
            .collect();
        doc = doc.apply(Edit::insert(at, &alt));
        for i in behind {
            doc.markers[i].position += alt.len();
        }
    }
    doc
}

/// Ensures a placeholder follows every closing blockquote, so typing after a
/// quote does not extend it.
pub fn anchor_blockquotes(mut doc: Document) -> Document {
    let closes: Vec<usize> = doc
        .markers
        .iter()
        .filter(|m| m.role == MarkerRole::Close(TagKind::Blockquote))
        .map(|m| m.position)
        .collect();

    for at in closes.into_iter().rev() {
        if doc
            .text
            .get(at..)
            .is_none_or(|rest| rest.starts_with(PLACEHOLDER))
        {
            continue;
        }
        let caret = doc.caret;
        doc = doc.apply(Edit::insert(at, PLACEHOLDER_STR));
        // A caret right at the quote's end stays inside it.
        if caret == Some(at) {
            doc.caret = caret;
        }
    }
    doc
}

/// Splices every marker's tag text into the text at its position, escaping
/// the text between tags.
///
/// Markers at one offset are written closes first, then raw tags, then
/// opens, each group in recording order.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::with_capacity(doc.text.len() + doc.markers.len() * 8);
    let mut written = 0;
    for marker in doc.sorted_markers() {
        let at = marker.position.clamp(written, doc.text.len());
        out.push_str(&html_escape::encode_text(&doc.text[written..at]));
        out.push_str(&marker.tag);
        written = at;
    }
    out.push_str(&html_escape::encode_text(&doc.text[written..]));
    out
}
