use super::{
    edit::Edit,
    marker::{Marker, MarkerRole},
    span::Span,
};

/// Invisible caret anchor inserted after converted spans.
pub const PLACEHOLDER: char = '\u{200B}';
pub const PLACEHOLDER_STR: &str = "\u{200B}";

/// Working state for one conversion pass.
///
/// Built fresh from one markup snapshot, rewritten stage by stage and dropped.
/// Every rewrite goes through [`Document::apply`], which keeps marker
/// positions and the caret consistent with the current `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Tag-free text. Shorthand delimiters stay in it until transduced.
    pub text: String,
    /// Insertion order is not significant except as a tie-break.
    pub markers: Vec<Marker>,
    /// Byte offset of the caret; present only on the live-typing path.
    pub caret: Option<usize>,
    /// Live-typing only: the caret sits inside a span whose styling is still
    /// undecided.
    pub active_style: bool,
}

impl Document {
    pub fn new(text: impl Into<String>, markers: Vec<Marker>) -> Self {
        Self {
            text: text.into(),
            markers,
            caret: None,
            active_style: false,
        }
    }

    /// Attaches a caret, clamped into the text and onto a char boundary.
    #[must_use]
    pub fn with_caret(mut self, caret: usize) -> Self {
        self.caret = Some(floor_char_boundary(&self.text, caret));
        self
    }

    /// Applies one text edit, remapping markers and caret in the same step.
    #[must_use]
    pub fn apply(self, edit: Edit<'_>) -> Self {
        let text = edit.apply(&self.text);
        let markers = self
            .markers
            .into_iter()
            .map(|m| Marker {
                position: edit.map_marker(m.position),
                ..m
            })
            .collect();
        Self {
            text,
            markers,
            caret: self.caret.map(|c| edit.map_caret(c)),
            active_style: self.active_style,
        }
    }

    #[must_use]
    pub fn push_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn has_marker(&self, role: MarkerRole, position: usize) -> bool {
        self.markers
            .iter()
            .any(|m| m.role == role && m.position == position)
    }

    pub fn caret_within(&self, span: Span) -> bool {
        self.caret.is_some_and(|c| span.contains(c))
    }

    /// Removes every placeholder from the text.
    #[must_use]
    pub fn strip_placeholders(self) -> Self {
        let found: Vec<usize> = self
            .text
            .match_indices(PLACEHOLDER)
            .map(|(at, _)| at)
            .collect();
        found.into_iter().rev().fold(self, |doc, at| {
            doc.apply(Edit::remove(at, PLACEHOLDER.len_utf8()))
        })
    }

    /// Collapses runs of adjacent placeholders down to one.
    #[must_use]
    pub fn collapse_placeholders(self) -> Self {
        let width = PLACEHOLDER.len_utf8();
        let found: Vec<usize> = self
            .text
            .match_indices(PLACEHOLDER)
            .map(|(at, _)| at)
            .collect();
        let redundant: Vec<usize> = found
            .windows(2)
            .filter(|pair| pair[1] == pair[0] + width)
            .map(|pair| pair[1])
            .collect();
        redundant
            .into_iter()
            .rev()
            .fold(self, |doc, at| doc.apply(Edit::remove(at, width)))
    }

    /// Drops markers that duplicate an earlier one exactly.
    #[must_use]
    pub fn dedup_markers(mut self) -> Self {
        let mut kept: Vec<Marker> = Vec::with_capacity(self.markers.len());
        for marker in self.markers {
            if !kept.contains(&marker) {
                kept.push(marker);
            }
        }
        self.markers = kept;
        self
    }

    /// Drops OPEN/CLOSE pairs whose content was consumed entirely, leaving
    /// both halves at one offset.
    #[must_use]
    pub fn drop_empty_pairs(mut self) -> Self {
        let mut i = 0;
        while i < self.markers.len() {
            let open = &self.markers[i];
            let close = open.open_kind().and_then(|kind| {
                self.markers[i + 1..]
                    .iter()
                    .position(|m| m.closes(kind) && m.position == open.position)
                    .map(|rel| i + 1 + rel)
            });
            match close {
                Some(close) => {
                    log::trace!("dropping empty {:?} at {}", open.tag, open.position);
                    self.markers.remove(close);
                    self.markers.remove(i);
                }
                None => i += 1,
            }
        }
        self
    }

    /// Markers in document order; closes sort before opens at equal positions.
    pub fn sorted_markers(&self) -> Vec<&Marker> {
        let mut sorted: Vec<&Marker> = self.markers.iter().collect();
        sorted.sort_by_key(|m| (m.position, m.tie_rank()));
        sorted
    }
}

pub(crate) fn floor_char_boundary(s: &str, offset: usize) -> usize {
    let mut offset = offset.min(s.len());
    while !s.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
