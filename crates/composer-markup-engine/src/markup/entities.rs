//! # Entities
//!
//! The committed-message representation: plain text plus typed ranges.
//! [`emit_entities`] produces it from a transduced [`Document`];
//! [`entities_to_markup`] renders it back for editing.
//!
//! Offsets and lengths are byte offsets into `text`.

use std::{cmp::Ordering, collections::VecDeque};

use serde::{Deserialize, Serialize};

use super::{
    document::Document,
    marker::{Marker, MarkerRole},
    serialize::degrade_images,
    tags::{TagKind, attribute, is_link_close, is_link_open, normalize_tag_text},
};
use crate::error::MarkupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Spoiler,
    Code,
    Pre,
    Blockquote,
    TextUrl,
}

impl EntityKind {
    /// The markup tag kind rendering this entity. Links are written as
    /// `<a href>` and have none.
    pub const fn tag_kind(self) -> Option<TagKind> {
        match self {
            EntityKind::Bold => Some(TagKind::Bold),
            EntityKind::Italic => Some(TagKind::Italic),
            EntityKind::Underline => Some(TagKind::Underline),
            EntityKind::Strike => Some(TagKind::Strike),
            EntityKind::Spoiler => Some(TagKind::Spoiler),
            EntityKind::Code => Some(TagKind::Code),
            EntityKind::Pre => Some(TagKind::Pre),
            EntityKind::Blockquote => Some(TagKind::Blockquote),
            EntityKind::TextUrl => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub offset: usize,
    pub length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Entity {
    pub fn new(kind: EntityKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
            url: None,
            language: None,
        }
    }

    pub fn text_url(offset: usize, length: usize, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::new(EntityKind::TextUrl, offset, length)
        }
    }

    /// Exclusive end offset, or `None` when `offset + length` overflows.
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.length)
    }
}

/// A committed message. `entities` is absent, not empty, when there are none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedText {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<Entity>>,
}

impl FormattedText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entities: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, MarkupError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn entities(&self) -> &[Entity] {
        self.entities.as_deref().unwrap_or_default()
    }
}

/// Consumes matched marker pairs in document order, outermost first, and
/// emits one entity per pair.
///
/// Images become their alt text first. Orphaned markers, fragment pairs and
/// links without a URL produce nothing; neither do zero-length pairs.
pub fn emit_entities(mut doc: Document) -> FormattedText {
    for marker in &mut doc.markers {
        marker.tag = normalize_tag_text(&marker.tag);
    }
    let doc = degrade_images(doc);

    let mut pending: VecDeque<Marker> = doc.sorted_markers().into_iter().cloned().collect();
    let mut entities = Vec::new();
    while let Some(first) = pending.pop_front() {
        match take_pair(&first, &mut pending) {
            Some(entity) if entity.length > 0 => entities.push(entity),
            Some(_) => {}
            None => log::trace!("emit: dropping {:?} at {}", first.tag, first.position),
        }
    }

    FormattedText {
        text: doc.text,
        entities: (!entities.is_empty()).then_some(entities),
    }
}

/// Finds and removes `first`'s counterpart from `pending`.
fn take_pair(first: &Marker, pending: &mut VecDeque<Marker>) -> Option<Entity> {
    match first.role {
        MarkerRole::Raw if is_link_open(&first.tag) => {
            let url = attribute(&first.tag, "href").filter(|url| !url.is_empty())?;
            let idx = pending
                .iter()
                .position(|m| m.role == MarkerRole::Raw && is_link_close(&m.tag))?;
            let close = pending.remove(idx)?;
            Some(Entity::text_url(
                first.position,
                close.position.saturating_sub(first.position),
                url,
            ))
        }
        MarkerRole::Open(kind) => {
            let idx = pending.iter().position(|m| m.closes(kind))?;
            let close = pending.remove(idx)?;
            let mut entity = Entity::new(
                kind.entity_kind()?,
                first.position,
                close.position.saturating_sub(first.position),
            );
            if kind == TagKind::Pre {
                entity.language = attribute(&first.tag, "data-language");
            }
            Some(entity)
        }
        _ => None,
    }
}

#[derive(Debug)]
struct Boundary<'a> {
    at: usize,
    closing: bool,
    index: usize,
    entity: &'a Entity,
}

impl Boundary<'_> {
    /// Closes end before anything new starts; inner spans close first and
    /// outer spans open first, so the output nests.
    fn order(&self, other: &Self) -> Ordering {
        self.at
            .cmp(&other.at)
            .then_with(|| match (self.closing, other.closing) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (true, true) => other
                    .entity
                    .offset
                    .cmp(&self.entity.offset)
                    .then(other.index.cmp(&self.index)),
                (false, false) => other
                    .entity
                    .length
                    .cmp(&self.entity.length)
                    .then(self.index.cmp(&other.index)),
            })
    }

    fn tag(&self) -> String {
        let entity = self.entity;
        match (entity.kind, self.closing) {
            (EntityKind::TextUrl, false) => format!(
                r#"<a href="{}">"#,
                html_escape::encode_double_quoted_attribute(
                    entity.url.as_deref().unwrap_or_default()
                )
            ),
            (EntityKind::TextUrl, true) => "</a>".to_string(),
            (EntityKind::Pre, false) if entity.language.is_some() => format!(
                r#"<pre data-language="{}">"#,
                html_escape::encode_double_quoted_attribute(
                    entity.language.as_deref().unwrap_or_default()
                )
            ),
            (kind, closing) => kind
                .tag_kind()
                .map(|tag| if closing { tag.close_tag() } else { tag.open_tag() })
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Renders formatted text as markup, escaping the text between tags.
///
/// Entities that fall outside the text, split a character, are empty, or are
/// links without a URL are skipped.
pub fn entities_to_markup(formatted: &FormattedText) -> String {
    let text = &formatted.text;
    let mut boundaries = Vec::new();

    for (index, entity) in formatted.entities().iter().enumerate() {
        let end = entity
            .end()
            .filter(|end| *end <= text.len() && text.is_char_boundary(*end));
        let renderable = entity.length > 0
            && text.is_char_boundary(entity.offset)
            && (entity.kind != EntityKind::TextUrl || entity.url.is_some());
        let Some(end) = end.filter(|_| renderable) else {
            log::debug!(
                "render: skipping {:?} at {}+{}",
                entity.kind,
                entity.offset,
                entity.length
            );
            continue;
        };
        for (at, closing) in [(entity.offset, false), (end, true)] {
            boundaries.push(Boundary {
                at,
                closing,
                index,
                entity,
            });
        }
    }
    boundaries.sort_by(|a, b| a.order(b));

    let mut out = String::with_capacity(text.len() + boundaries.len() * 8);
    let mut written = 0;
    for boundary in &boundaries {
        out.push_str(&html_escape::encode_text(&text[written..boundary.at]));
        out.push_str(&boundary.tag());
        written = boundary.at;
    }
    out.push_str(&html_escape::encode_text(&text[written..]));
    out
}
