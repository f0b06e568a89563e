//! Tag extraction: markup in, tag-free text plus markers out.

use super::{document::Document, marker::Marker, span::Span, tags::classify};

/// Longest character reference we try to decode (`&thetasym;` and friends).
const MAX_REFERENCE_LEN: usize = 32;

/// Strips every tag from `markup`, recording a marker for each at its offset
/// in the tag-free text, and decodes character references in the text.
///
/// An opening and closing tag of the same kind that meet at one offset
/// cancel out (`<b></b>`, and `</b><b>` merging two adjacent spans).
/// Unrecognized tags are kept as raw markers.
pub fn extract(markup: &str) -> Document {
    let mut text = markup.to_string();
    let mut markers: Vec<Marker> = Vec::new();
    let mut i = 0;

    while let Some(rel) = text[i..].find(|c: char| c == '<' || c == '&') {
        let at = i + rel;

        if text.as_bytes()[at] == b'&' {
            match decode_reference(&text[at..]) {
                Some((consumed, decoded)) => {
                    text.replace_range(at..at + consumed, &decoded);
                    i = at + decoded.len();
                }
                None => i = at + 1,
            }
            continue;
        }

        let Some(tag) = locate_tag(&text, at) else {
            i = at + 1;
            continue;
        };

        let classified = classify(&text[tag.start..tag.end]);
        text.replace_range(tag.start..tag.end, "");
        let candidate = Marker::new(at, classified.role, classified.text);

        // Markers recorded so far all sit at or before `at`, so removing the
        // tag text leaves their positions valid.
        match markers
            .iter()
            .position(|m| m.position == at && m.pairs_with(&candidate))
        {
            Some(counterpart) => {
                log::trace!("extract: {:?} cancels at {at}", candidate.tag);
                markers.remove(counterpart);
            }
            None => {
                log::trace!("extract: {:?} {:?} at {at}", candidate.role, candidate.tag);
                markers.push(candidate);
            }
        }
        i = at;
    }

    Document::new(text, markers)
}

/// Finds the tag starting at `at`, if the `<` there really opens one.
fn locate_tag(text: &str, at: usize) -> Option<Span> {
    let rest = &text[at..];
    if rest.starts_with("<!--") {
        let close = rest.find("-->")?;
        return Some(Span::new(at, close + 3));
    }
    let next = rest.as_bytes().get(1)?;
    if !(next.is_ascii_alphabetic() || *next == b'/') {
        return None;
    }
    let close = rest.find('>')?;
    Some(Span::new(at, close + 1))
}

/// Decodes the character reference at the start of `s` (which begins with
/// `&`). Returns the consumed length and the decoded text.
fn decode_reference(s: &str) -> Option<(usize, String)> {
    let semi = s.bytes().take(MAX_REFERENCE_LEN).position(|b| b == b';')?;
    let name = &s[1..semi];
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'#') {
        return None;
    }
    let candidate = &s[..=semi];
    let decoded = html_escape::decode_html_entities(candidate);
    (decoded != candidate).then(|| (candidate.len(), decoded.into_owned()))
}
