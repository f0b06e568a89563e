//! # Marker Reconciler
//!
//! Live-typing only. After transduction, revisits every marker pair that
//! encloses the caret and reads the delimiter characters still sitting at its
//! boundaries to decide what the user is doing:
//!
//! - **complete**: full delimiters on both sides, the span is being edited
//! - **broken**: one side lost delimiter characters, the style is dropped
//! - **bare**: no delimiters left, so they are re-exposed inside the tags
//!   and the caret moves past the exposed opening run

use super::{
    document::Document,
    kinds::{Ambiguity, Shorthand, StyleKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Complete,
    Broken,
    Bare,
}

/// Reconciles the pairs enclosing the caret. Documents without a caret are
/// returned unchanged.
pub fn reconcile(mut doc: Document) -> Document {
    let Some(mut caret) = doc.caret else {
        return doc;
    };

    let mut i = 0;
    while i < caret {
        let Some(open_idx) = doc.markers.iter().position(|m| {
            m.is_open() && i <= m.position && m.position <= caret
        }) else {
            break;
        };
        let open_at = doc.markers[open_idx].position;
        i = open_at + 1;

        let Some(kind) = doc.markers[open_idx].open_kind() else {
            continue;
        };
        let Some(close_idx) = doc
            .markers
            .iter()
            .skip(open_idx + 1)
            .position(|m| m.closes(kind))
            .map(|rel| open_idx + 1 + rel)
        else {
            continue;
        };
        let close_at = doc.markers[close_idx].position;
        if caret > close_at {
            continue;
        }
        let Some(style) = StyleKind::for_tag(kind) else {
            continue;
        };
        let sh = style.shorthand();

        match classify(sh, &doc.text, open_at, close_at) {
            Boundary::Broken => {
                log::debug!("{style:?}: delimiters broken at {open_at}..{close_at}, unstyle");
                doc.markers.remove(close_idx);
                doc.markers.remove(open_idx);
                doc.active_style = false;
            }
            Boundary::Complete => {
                log::trace!("{style:?}: complete span under caret");
                doc.active_style = true;
            }
            Boundary::Bare if !doc.active_style => {
                log::debug!("{style:?}: exposing delimiters at {open_at}..{close_at}");
                doc.markers[open_idx].tag.push_str(sh.delimiter);
                doc.markers[close_idx].tag.insert_str(0, sh.delimiter);
                caret += sh.width();
                doc.active_style = true;
            }
            Boundary::Bare => {}
        }
    }

    doc.caret = Some(caret);
    doc
}

fn classify(sh: &Shorthand, text: &str, open_at: usize, close_at: usize) -> Boundary {
    let bytes = text.as_bytes();
    let is_delim = |at: Option<usize>| {
        at.and_then(|p| bytes.get(p))
            .is_some_and(|b| *b == sh.byte())
    };

    match sh.ambiguity {
        Ambiguity::Symmetric => {
            let open = (is_delim(Some(open_at)), is_delim(Some(open_at + 1)));
            let close = (
                is_delim(close_at.checked_sub(1)),
                is_delim(close_at.checked_sub(2)),
            );
            let full = |(near, far): (bool, bool)| near && far;
            let partial = |(near, far): (bool, bool)| near && !far;
            if full(open) && full(close) {
                Boundary::Complete
            } else if (partial(open) && full(close)) || (full(open) && partial(close)) {
                Boundary::Broken
            } else {
                Boundary::Bare
            }
        }
        Ambiguity::Window { broken_min } => {
            let width = sh.width();
            let open_slots = (open_at..open_at + width).map(Some);
            let close_slots = (0..width).map(|k| close_at.checked_sub(width - k));
            let count = open_slots
                .chain(close_slots)
                .filter(|slot| is_delim(*slot))
                .count();
            if count == 2 * width {
                Boundary::Complete
            } else if count >= broken_min {
                Boundary::Broken
            } else {
                Boundary::Bare
            }
        }
    }
}
