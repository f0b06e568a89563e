//! Caret mapping between plain-text offsets and text segments.
//!
//! The editable surface holds its text in several nodes; walking them depth
//! first and concatenating gives the plain text the converter works on.
//! These functions translate between the two coordinate systems.

use crate::markup::document::floor_char_boundary;

/// A caret inside one text segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretPosition {
    /// Index into the segment list.
    pub segment: usize,
    /// Byte offset within that segment.
    pub local_offset: usize,
}

/// Maps a plain-text offset onto the segment containing it.
///
/// An offset on the boundary between two segments lands at the end of the
/// earlier one. An offset past the end of all text falls back to the end of
/// the last segment. Returns `None` only when there are no segments.
pub fn offset_to_position<S: AsRef<str>>(segments: &[S], offset: usize) -> Option<CaretPosition> {
    let mut remaining = offset;
    for (segment, text) in segments.iter().enumerate() {
        let text = text.as_ref();
        if remaining <= text.len() {
            return Some(CaretPosition {
                segment,
                local_offset: floor_char_boundary(text, remaining),
            });
        }
        remaining -= text.len();
    }

    let (segment, last) = segments.iter().enumerate().next_back()?;
    log::debug!("caret {offset} is past the text, placing it at the end");
    Some(CaretPosition {
        segment,
        local_offset: last.as_ref().len(),
    })
}

/// Inverse of [`offset_to_position`]. `None` if the segment does not exist.
pub fn position_to_offset<S: AsRef<str>>(segments: &[S], position: CaretPosition) -> Option<usize> {
    let target = segments.get(position.segment)?.as_ref();
    let before: usize = segments[..position.segment]
        .iter()
        .map(|s| s.as_ref().len())
        .sum();
    Some(before + position.local_offset.min(target.len()))
}
