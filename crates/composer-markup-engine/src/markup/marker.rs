use super::tags::TagKind;

/// What a marker stands for in the tag-free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerRole {
    Open(TagKind),
    Close(TagKind),
    /// A tag the converter does not pair (links, images, unknown markup).
    /// Spliced back verbatim.
    Raw,
}

/// A recorded tag boundary at a byte offset into the tag-free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub position: usize,
    pub role: MarkerRole,
    /// Markup spliced back in at `position` by the serializer.
    pub tag: String,
}

impl Marker {
    pub fn new(position: usize, role: MarkerRole, tag: impl Into<String>) -> Self {
        Self {
            position,
            role,
            tag: tag.into(),
        }
    }

    pub fn open(kind: TagKind, position: usize) -> Self {
        Self::new(position, MarkerRole::Open(kind), kind.open_tag())
    }

    pub fn close(kind: TagKind, position: usize) -> Self {
        Self::new(position, MarkerRole::Close(kind), kind.close_tag())
    }

    pub fn raw(tag: impl Into<String>, position: usize) -> Self {
        Self::new(position, MarkerRole::Raw, tag)
    }

    pub fn open_kind(&self) -> Option<TagKind> {
        match self.role {
            MarkerRole::Open(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open_kind().is_some()
    }

    pub fn closes(&self, kind: TagKind) -> bool {
        self.role == MarkerRole::Close(kind)
    }

    /// True when `self` and `other` are the two halves of one pair.
    pub fn pairs_with(&self, other: &Marker) -> bool {
        match (self.role, other.role) {
            (MarkerRole::Open(a), MarkerRole::Close(b))
            | (MarkerRole::Close(a), MarkerRole::Open(b)) => a == b,
            _ => false,
        }
    }

    /// Ordering among markers sharing a position: closes end the previous
    /// span before anything new starts.
    pub(crate) fn tie_rank(&self) -> u8 {
        match self.role {
            MarkerRole::Close(_) => 0,
            MarkerRole::Raw => 1,
            MarkerRole::Open(_) => 2,
        }
    }
}
