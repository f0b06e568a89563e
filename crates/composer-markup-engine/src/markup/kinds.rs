//! # Shorthand Kinds
//!
//! The six Markdown-style shorthands and everything that differs between
//! them: delimiter, the tag kind they convert to, and how ambiguous delimiter
//! runs are read.
//!
//! The transducer and reconciler take a [`Shorthand`] descriptor and never
//! hardcode `**` or `` ` ``.

use super::tags::TagKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Bold,
    Italic,
    Strike,
    Spoiler,
    Pre,
    Code,
}

/// How a delimiter run next to a span boundary is read.
///
/// The two policies disagree on what an extra delimiter character means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ambiguity {
    /// Two-character delimiters. Each boundary is either a full run, a
    /// single character, or absent. A full run on one side with a single
    /// character on the other means the user deleted into the delimiter.
    /// While repairing, a run of three is read as one content character plus
    /// the delimiter, and a run of four as a doubled delimiter.
    Symmetric,
    /// Count delimiter characters in a window of `delimiter.len()` slots at
    /// each boundary. All slots filled is a complete span; a count of at
    /// least `broken_min` (but not all) is a span the user broke.
    Window { broken_min: usize },
}

/// Per-kind configuration for the generic shorthand handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shorthand {
    pub kind: StyleKind,
    pub delimiter: &'static str,
    pub tag: TagKind,
    pub ambiguity: Ambiguity,
    /// Back-to-back delimiters with nothing between collapse to nothing.
    /// Otherwise the empty pair is skipped over and left in the text.
    pub collapse_empty: bool,
    /// With a caret present, delimiters are never removed: the block stays
    /// visibly open for continued typing.
    pub keep_delimiters_while_editing: bool,
    /// On re-entering a span, an opening run one character too long is
    /// trimmed back to the delimiter.
    pub trim_open_excess: bool,
}

const BOLD: Shorthand = Shorthand {
    kind: StyleKind::Bold,
    delimiter: "**",
    tag: TagKind::Bold,
    ambiguity: Ambiguity::Symmetric,
    collapse_empty: true,
    keep_delimiters_while_editing: false,
    trim_open_excess: false,
};

const ITALIC: Shorthand = Shorthand {
    kind: StyleKind::Italic,
    delimiter: "__",
    tag: TagKind::Italic,
    ..BOLD
};

const STRIKE: Shorthand = Shorthand {
    kind: StyleKind::Strike,
    delimiter: "~~",
    tag: TagKind::Strike,
    ..BOLD
};

const SPOILER: Shorthand = Shorthand {
    kind: StyleKind::Spoiler,
    delimiter: "||",
    tag: TagKind::Spoiler,
    ..BOLD
};

const PRE: Shorthand = Shorthand {
    kind: StyleKind::Pre,
    delimiter: "```",
    tag: TagKind::Pre,
    ambiguity: Ambiguity::Window { broken_min: 4 },
    collapse_empty: true,
    keep_delimiters_while_editing: true,
    trim_open_excess: true,
};

const CODE: Shorthand = Shorthand {
    kind: StyleKind::Code,
    delimiter: "`",
    tag: TagKind::Code,
    ambiguity: Ambiguity::Window { broken_min: 1 },
    collapse_empty: false,
    keep_delimiters_while_editing: false,
    trim_open_excess: false,
};

impl StyleKind {
    /// Scan priority. When two delimiters start at the same offset (``` and
    /// `), the earlier entry wins.
    pub const ALL: [StyleKind; 6] = [
        StyleKind::Bold,
        StyleKind::Italic,
        StyleKind::Strike,
        StyleKind::Spoiler,
        StyleKind::Pre,
        StyleKind::Code,
    ];

    pub const fn shorthand(self) -> &'static Shorthand {
        match self {
            StyleKind::Bold => &BOLD,
            StyleKind::Italic => &ITALIC,
            StyleKind::Strike => &STRIKE,
            StyleKind::Spoiler => &SPOILER,
            StyleKind::Pre => &PRE,
            StyleKind::Code => &CODE,
        }
    }

    pub const fn delimiter(self) -> &'static str {
        self.shorthand().delimiter
    }

    pub const fn tag_kind(self) -> TagKind {
        self.shorthand().tag
    }

    /// The shorthand that converts to `tag`, if any.
    pub fn for_tag(tag: TagKind) -> Option<StyleKind> {
        Self::ALL.into_iter().find(|kind| kind.tag_kind() == tag)
    }
}

impl Shorthand {
    pub fn width(&self) -> usize {
        self.delimiter.len()
    }

    /// The single character the delimiter repeats.
    pub fn byte(&self) -> u8 {
        self.delimiter.as_bytes()[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiters_are_single_character_runs() {
        for kind in StyleKind::ALL {
            let sh = kind.shorthand();
            assert!(sh.delimiter.bytes().all(|b| b == sh.byte()));
            assert_eq!(sh.kind, kind);
        }
    }

    #[test]
    fn pre_outranks_code() {
        let pre = StyleKind::ALL.iter().position(|k| *k == StyleKind::Pre);
        let code = StyleKind::ALL.iter().position(|k| *k == StyleKind::Code);
        assert!(pre < code);
    }

    #[test]
    fn underline_has_no_shorthand() {
        assert_eq!(StyleKind::for_tag(TagKind::Underline), None);
        assert_eq!(StyleKind::for_tag(TagKind::Spoiler), Some(StyleKind::Spoiler));
    }
}
