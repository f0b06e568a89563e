//! # Shorthand Transducer
//!
//! Walks the tag-free text left to right, finds the earliest shorthand
//! delimiter of any kind, and lets that kind's handler decide what the
//! delimiter pair means:
//!
//! - **collapse**: `****` with nothing between is deleted
//! - **mark**: a fresh complete pair gets an OPEN/CLOSE marker pair
//! - **enter**: the caret sits inside an already-marked pair, so its raw
//!   delimiters stay visible for editing
//! - **finalize**: delimiters are removed and a placeholder anchors the end
//! - **repair**: an extra or orphaned closing run next to an existing span
//!   is stripped
//!
//! Each decision is one [`step`] over an explicit [`Scan`] value. Every branch
//! either advances `Scan::index` or consumes delimiter characters, so the
//! loop terminates on any input.

use super::{
    document::{Document, PLACEHOLDER_STR},
    edit::Edit,
    kinds::{Ambiguity, Shorthand, StyleKind},
    marker::{Marker, MarkerRole},
    span::Span,
};

/// State threaded through the fixpoint loop.
#[derive(Debug)]
struct Scan {
    doc: Document,
    /// Next delimiter search starts here.
    index: usize,
    /// Caret distance pulled back when the last step marked a fresh pair.
    /// Given back unless the caret ends up inside that pair.
    held_back: usize,
}

enum Step {
    Continue(Scan),
    Done(Document),
}

/// One located delimiter pair.
#[derive(Debug, Clone, Copy)]
struct Pair {
    open: Span,
    close: Span,
}

impl Pair {
    fn is_empty(self) -> bool {
        self.close.start == self.open.end
    }
}

/// Runs shorthand detection to completion over `doc`.
///
/// With no caret (committed messages) every complete pair is finalized. With
/// a caret (live typing) the pair under the caret keeps its delimiters and
/// `active_style` reports it.
pub fn transduce(doc: Document) -> Document {
    let mut scan = Scan {
        doc,
        index: 0,
        held_back: 0,
    };
    loop {
        match step(scan) {
            Step::Continue(next) => scan = next,
            Step::Done(doc) => return doc,
        }
    }
}

fn step(scan: Scan) -> Step {
    match next_delimiter(&scan.doc.text, scan.index) {
        Some((kind, start)) => handle(kind.shorthand(), start, scan),
        None => Step::Done(scan.doc),
    }
}

/// Earliest delimiter at or after `from`; ties go to the kind listed first.
fn next_delimiter(text: &str, from: usize) -> Option<(StyleKind, usize)> {
    let tail = text.get(from..)?;
    StyleKind::ALL
        .into_iter()
        .filter_map(|kind| tail.find(kind.delimiter()).map(|rel| (kind, from + rel)))
        .min_by_key(|(_, at)| *at)
}

fn find_from(text: &str, pat: &str, from: usize) -> Option<usize> {
    text.get(from..)?.find(pat).map(|rel| from + rel)
}

fn run_length(text: &str, at: usize, byte: u8) -> usize {
    text.as_bytes()
        .get(at..)
        .map_or(0, |rest| rest.iter().take_while(|b| **b == byte).count())
}

/// The run at `start` is the tail of a marked pair: a CLOSE sits right after
/// it and the nearest earlier OPEN of the kind has no CLOSE in between.
/// A CLOSE with no OPEN before it is a stray tag and does not count.
fn closes_marked_pair(doc: &Document, sh: &Shorthand, start: usize) -> bool {
    let close_at = start + sh.width();
    if !doc.has_marker(MarkerRole::Close(sh.tag), close_at) {
        return false;
    }
    let Some(open_at) = doc
        .markers
        .iter()
        .filter(|m| m.role == MarkerRole::Open(sh.tag) && m.position < start)
        .map(|m| m.position)
        .max()
    else {
        return false;
    };
    !doc
        .markers
        .iter()
        .any(|m| m.closes(sh.tag) && open_at < m.position && m.position < close_at)
}

fn handle(sh: &Shorthand, start: usize, scan: Scan) -> Step {
    let Scan {
        mut doc,
        index,
        held_back,
    } = scan;
    let width = sh.width();
    let open_role = MarkerRole::Open(sh.tag);
    let close_role = MarkerRole::Close(sh.tag);

    let opened = doc.has_marker(open_role, start);

    // The closing run of a pair that is already marked (entered spans and
    // live pre blocks keep their delimiters): not the start of a new pair.
    if !opened && closes_marked_pair(&doc, sh, start) {
        return Step::Continue(Scan {
            doc,
            index: start + width,
            held_back: 0,
        });
    }

    let mut end = find_from(&doc.text, sh.delimiter, start + width);
    let closed = end.is_some_and(|e| doc.has_marker(close_role, e + width));

    if opened && !closed {
        if let Some(e) = end {
            let run = run_length(&doc.text, e, sh.byte());
            if sh.ambiguity == Ambiguity::Symmetric && run == width + 1 {
                // `***`: first character is content, the rest closes.
                end = Some(e + 1);
            } else {
                log::debug!("{:?}: strip runaway delimiter at {e}", sh.kind);
                let doc = doc.apply(Edit::remove(e, width));
                return Step::Continue(Scan {
                    doc,
                    index,
                    held_back: 0,
                });
            }
        }
    }

    let Some(end) = end else {
        return Step::Continue(Scan {
            doc,
            index: start + 1,
            held_back: 0,
        });
    };

    let pair = Pair {
        open: Span::new(start, width),
        close: Span::new(end, width),
    };

    if opened || closed {
        if let Some(caret) = doc.caret.as_mut() {
            *caret += held_back;
        }
        revisit(sh, pair, doc, held_back)
    } else {
        mark(sh, pair, doc)
    }
}

/// A complete pair with no markers yet.
fn mark(sh: &Shorthand, pair: Pair, mut doc: Document) -> Step {
    let start = pair.open.start;

    if pair.is_empty() {
        if sh.collapse_empty {
            log::debug!("{:?}: collapse empty pair at {start}", sh.kind);
            let doc = doc.apply(Edit::remove(start, pair.close.end - start));
            return Step::Continue(Scan {
                doc,
                index: start,
                held_back: 0,
            });
        }
        return Step::Continue(Scan {
            doc,
            index: pair.close.end,
            held_back: 0,
        });
    }

    log::debug!(
        "{:?}: mark {}..{}",
        sh.kind,
        pair.open.start,
        pair.close.end
    );
    let close_at = pair.close.end;
    doc = doc
        .push_marker(Marker::open(sh.tag, start))
        .push_marker(Marker::close(sh.tag, close_at));

    let span = Span {
        start,
        end: close_at,
    };
    if doc.caret_within(span) {
        doc.active_style = true;
    }

    let mut held_back = 0;
    if let Some(caret) = doc.caret.as_mut()
        && *caret >= close_at
    {
        *caret -= sh.width();
        held_back = sh.width();
    }

    Step::Continue(Scan {
        doc,
        index: start,
        held_back,
    })
}

/// A pair whose markers already exist: enter it, keep it open, or finalize.
fn revisit(sh: &Shorthand, pair: Pair, mut doc: Document, held_back: usize) -> Step {
    let start = pair.open.start;
    let close_at = pair.close.end;

    let provisional = doc.caret.map(|c| c.saturating_sub(held_back));
    let span = Span {
        start,
        end: close_at,
    };
    let inside = provisional.is_some_and(|c| span.contains(c));

    if inside && !doc.active_style {
        log::debug!("{:?}: caret entered {start}..{close_at}", sh.kind);
        doc.caret = provisional;
        doc.active_style = true;
        if sh.trim_open_excess && run_length(&doc.text, start, sh.byte()) > sh.width() {
            doc = doc.apply(Edit::remove(start, 1));
        }
        return Step::Continue(Scan {
            doc,
            index: pair.open.end,
            held_back: 0,
        });
    }

    if sh.keep_delimiters_while_editing && doc.caret.is_some() {
        if doc.caret == Some(close_at) {
            doc = doc.apply(Edit::insert(close_at, PLACEHOLDER_STR));
        }
        return Step::Continue(Scan {
            doc,
            index: pair.open.end,
            held_back: 0,
        });
    }

    log::debug!("{:?}: finalize {start}..{close_at}", sh.kind);
    let doc = doc
        .apply(Edit::replace(
            pair.close.start,
            pair.close.len(),
            PLACEHOLDER_STR,
        ))
        .apply(Edit::remove(start, pair.open.len()));
    Step::Continue(Scan {
        doc,
        index: start,
        held_back: 0,
    })
}
