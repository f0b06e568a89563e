//! # Markup Conversion
//!
//! Converts editable-surface markup to formatted text and back, detecting
//! Markdown-style shorthand along the way.
//!
//! ## Pipeline
//!
//! Every pass builds a fresh [`Document`] from one markup snapshot and runs it
//! through a fixed sequence of stages:
//!
//! 1. **`preprocess`**: fold `<div>`/`<br>` line structure into newlines
//! 2. **`extract`**: strip tags into markers over tag-free text
//! 3. **`transduce`**: turn `**bold**`-style shorthand into marker pairs
//! 4. **`reconcile`** (live only): decide what the span under the caret means
//! 5. **`serialize`** (live) or **`entities`** (committed): produce output
//!
//! ## Modules
//!
//! - **`document`**: `Document` working state; every text change is an `Edit`
//! - **`kinds`**: per-shorthand descriptors (delimiter, tag, ambiguity policy)
//! - **`tags`**: tag classification, synonyms, attribute lookup
//! - **`invariants`**: runtime checks for marker positions and pairing
//!
//! All offsets, including the caret, are byte offsets into the tag-free text.

pub mod cursor;
pub mod document;
pub mod edit;
pub mod entities;
pub mod extract;
pub mod invariants;
pub mod kinds;
pub mod marker;
pub mod preprocess;
pub mod reconcile;
pub mod serialize;
pub mod span;
pub mod tags;
pub mod transduce;

#[cfg(test)]
mod tests;

pub use document::{Document, PLACEHOLDER};
pub use entities::{Entity, EntityKind, FormattedText, emit_entities, entities_to_markup};
pub use extract::extract;
pub use reconcile::reconcile;
pub use serialize::serialize;
pub use transduce::transduce;

use crate::error::MarkupError;

/// Switches for one conversion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Leave shorthand delimiters as literal text.
    pub skip_markdown: bool,
    /// Remove caret placeholders from committed text.
    pub strip_placeholders: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            skip_markdown: false,
            strip_placeholders: true,
        }
    }
}

/// Result of a live-typing pass, ready to be written back to the editable
/// surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveMarkup {
    pub markup: String,
    /// Byte offset into the text content of `markup`.
    pub caret: usize,
    /// The caret is inside a span whose styling is still undecided.
    pub active_style: bool,
}

/// Committed-message path: markup in, plain text plus entities out.
pub fn parse_formatted_text(markup: &str, options: &ParseOptions) -> FormattedText {
    let mut doc = extract(&preprocess::for_committed(markup));
    if !options.skip_markdown {
        doc = transduce(doc);
    }
    doc = doc.dedup_markers();
    if options.strip_placeholders {
        doc = doc.strip_placeholders();
    }
    emit_entities(doc.drop_empty_pairs())
}

/// [`parse_formatted_text`] over raw bytes.
pub fn parse_formatted_bytes(
    markup: &[u8],
    options: &ParseOptions,
) -> Result<FormattedText, MarkupError> {
    let markup = std::str::from_utf8(markup)?;
    Ok(parse_formatted_text(markup, options))
}

/// Live-typing path: markup and caret in, markup and caret out.
///
/// A caret past the end of the text, or inside a multi-byte character, is
/// moved back to the nearest valid offset.
pub fn parse_for_editable(markup: &str, caret: usize, options: &ParseOptions) -> LiveMarkup {
    let mut doc = extract(&preprocess::for_editable(markup)).with_caret(caret);
    if !options.skip_markdown {
        doc = transduce(doc);
    }
    let doc = reconcile(
        doc.dedup_markers()
            .collapse_placeholders()
            .drop_empty_pairs(),
    );
    let doc = serialize::anchor_blockquotes(serialize::degrade_images(doc));
    log::debug!(
        "live pass: caret {caret} -> {:?}, active {}",
        doc.caret,
        doc.active_style
    );

    LiveMarkup {
        markup: serialize(&doc),
        caret: doc.caret.unwrap_or_default(),
        active_style: doc.active_style,
    }
}
