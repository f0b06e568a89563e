use super::{document::Document, marker::MarkerRole};

/// Validates a document after any conversion stage.
///
/// Asserts that:
/// - Every marker position is within the text and on a char boundary
/// - The caret, if present, is within the text and on a char boundary
/// - No OPEN is followed by a CLOSE of its kind at the same offset
/// - Each CLOSE has an OPEN of the same kind at or before it
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(doc: &Document) {
    let n = doc.text.len();
    for m in &doc.markers {
        assert!(
            m.position <= n && doc.text.is_char_boundary(m.position),
            "marker out of bounds: {:?} at {} (text len: {})",
            m.tag,
            m.position,
            n
        );
    }

    if let Some(caret) = doc.caret {
        assert!(
            caret <= n && doc.text.is_char_boundary(caret),
            "caret out of bounds: {} (text len: {})",
            caret,
            n
        );
    }

    for (i, m) in doc.markers.iter().enumerate() {
        if let Some(kind) = m.open_kind() {
            assert!(
                !doc.markers[i + 1..]
                    .iter()
                    .any(|c| c.closes(kind) && c.position == m.position),
                "empty pair: {:?} at {}",
                m.tag,
                m.position
            );
        }
    }

    let mut open: Vec<MarkerRole> = Vec::new();
    for m in doc.sorted_markers() {
        match m.role {
            MarkerRole::Open(kind) => open.push(MarkerRole::Open(kind)),
            MarkerRole::Close(kind) => {
                let idx = open.iter().rposition(|r| *r == MarkerRole::Open(kind));
                assert!(
                    idx.is_some(),
                    "close without open: {:?} at {}",
                    m.tag,
                    m.position
                );
                if let Some(idx) = idx {
                    open.remove(idx);
                }
            }
            MarkerRole::Raw => {}
        }
    }
}
