//! Tag classification: synonym folding, the open/close pairs table, and
//! attribute lookup for the handful of attributes the converter reads
//! (`href`, `alt`, `data-language`).

use std::sync::OnceLock;

use regex::Regex;

use super::{cursor::Cursor, entities::EntityKind, marker::MarkerRole};

/// Tag kinds the extractor pairs up. Anything else becomes a raw marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Spoiler,
    Code,
    Pre,
    Blockquote,
    /// `<!--StartFragment-->` / `<!--EndFragment-->` wrappers from paste events.
    Fragment,
}

/// Canonical tag name → kind. Synonyms are folded before lookup, so this is
/// the whole pairs table: a kind's opening tag is closed by `close_tag()`.
const PAIRS: [(&str, TagKind); 7] = [
    ("b", TagKind::Bold),
    ("i", TagKind::Italic),
    ("u", TagKind::Underline),
    ("s", TagKind::Strike),
    ("code", TagKind::Code),
    ("pre", TagKind::Pre),
    ("blockquote", TagKind::Blockquote),
];

const SYNONYMS: [(&str, &str); 5] = [
    ("strong", "b"),
    ("em", "i"),
    ("ins", "u"),
    ("strike", "s"),
    ("del", "s"),
];

const FRAGMENT_START: &str = "<!--StartFragment-->";
const FRAGMENT_END: &str = "<!--EndFragment-->";

impl TagKind {
    /// Opening tag written when a marker of this kind is synthesized.
    pub const fn open_tag(self) -> &'static str {
        match self {
            TagKind::Bold => "<b>",
            TagKind::Italic => "<i>",
            TagKind::Underline => "<u>",
            TagKind::Strike => "<s>",
            TagKind::Spoiler => r#"<span data-entity-type="spoiler">"#,
            TagKind::Code => "<code>",
            TagKind::Pre => "<pre>",
            TagKind::Blockquote => "<blockquote>",
            TagKind::Fragment => FRAGMENT_START,
        }
    }

    pub const fn close_tag(self) -> &'static str {
        match self {
            TagKind::Bold => "</b>",
            TagKind::Italic => "</i>",
            TagKind::Underline => "</u>",
            TagKind::Strike => "</s>",
            TagKind::Spoiler => "</span>",
            TagKind::Code => "</code>",
            TagKind::Pre => "</pre>",
            TagKind::Blockquote => "</blockquote>",
            TagKind::Fragment => FRAGMENT_END,
        }
    }

    /// The entity a matched pair of this kind commits to. Fragments carry none.
    pub const fn entity_kind(self) -> Option<EntityKind> {
        match self {
            TagKind::Bold => Some(EntityKind::Bold),
            TagKind::Italic => Some(EntityKind::Italic),
            TagKind::Underline => Some(EntityKind::Underline),
            TagKind::Strike => Some(EntityKind::Strike),
            TagKind::Spoiler => Some(EntityKind::Spoiler),
            TagKind::Code => Some(EntityKind::Code),
            TagKind::Pre => Some(EntityKind::Pre),
            TagKind::Blockquote => Some(EntityKind::Blockquote),
            TagKind::Fragment => None,
        }
    }
}

/// A tag after synonym folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTag {
    pub role: MarkerRole,
    /// Tag text to carry on the marker: canonical for recognized tags,
    /// verbatim for everything else.
    pub text: String,
}

/// Classifies one complete tag occurrence (`<...>` or `<!--...-->`).
pub fn classify(tag: &str) -> ClassifiedTag {
    if tag.starts_with("<!--") {
        let role = match tag {
            FRAGMENT_START => MarkerRole::Open(TagKind::Fragment),
            FRAGMENT_END => MarkerRole::Close(TagKind::Fragment),
            _ => MarkerRole::Raw,
        };
        return ClassifiedTag {
            role,
            text: tag.to_string(),
        };
    }

    let mut cur = Cursor::new(tag);
    cur.eat(b'<');
    let closing = cur.eat(b'/');
    let name = cur.name().to_ascii_lowercase();
    let rest = cur.rest();

    let canonical = SYNONYMS
        .iter()
        .find(|(from, _)| *from == name)
        .map_or(name.as_str(), |(_, to)| *to);

    let kind = if canonical == "span" {
        (closing || is_spoiler_span(rest)).then_some(TagKind::Spoiler)
    } else {
        PAIRS
            .iter()
            .find(|(n, _)| *n == canonical)
            .map(|(_, kind)| *kind)
    };

    match kind {
        Some(kind) => ClassifiedTag {
            role: if closing {
                MarkerRole::Close(kind)
            } else {
                MarkerRole::Open(kind)
            },
            text: format!("<{}{canonical}{rest}", if closing { "/" } else { "" }),
        },
        None => ClassifiedTag {
            role: MarkerRole::Raw,
            text: tag.to_string(),
        },
    }
}

/// A bare `<span>` or one whose attributes mention the spoiler entity type.
fn is_spoiler_span(attrs: &str) -> bool {
    let attrs = attrs.trim_end_matches('>').trim();
    attrs.is_empty() || attrs.to_ascii_lowercase().contains("spoiler")
}

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE_REGEX: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE_REGEX.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("Invalid attribute regex")
    })
}

/// Reads a quoted attribute value from a tag, decoding character references.
pub fn attribute(tag: &str, name: &str) -> Option<String> {
    attribute_regex()
        .captures_iter(tag)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
        .map(|value| html_escape::decode_html_entities(value.as_str()).into_owned())
}

/// Cleans up tag text pasted from other sources before it is read for
/// attributes: backslashes dropped, whitespace runs (newlines included)
/// collapsed to one space, and space before the closing `>` removed.
pub fn normalize_tag_text(tag: &str) -> String {
    let stripped: String = tag.chars().filter(|c| *c != '\\').collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.replace(" >", ">")
}

/// True for `<img ...>` tags, which degrade to their alt text.
pub fn is_image(tag: &str) -> bool {
    tag.get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("<img"))
}

/// True for `<a ...>` opening tags.
pub fn is_link_open(tag: &str) -> bool {
    let mut cur = Cursor::new(tag);
    cur.eat(b'<') && cur.name().eq_ignore_ascii_case("a")
}

/// True for `</a>`.
pub fn is_link_close(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("</a>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("<strong>", MarkerRole::Open(TagKind::Bold), "<b>")]
    #[case("</strong>", MarkerRole::Close(TagKind::Bold), "</b>")]
    #[case("<em>", MarkerRole::Open(TagKind::Italic), "<i>")]
    #[case("<ins>", MarkerRole::Open(TagKind::Underline), "<u>")]
    #[case("</u>", MarkerRole::Close(TagKind::Underline), "</u>")]
    #[case("<strike>", MarkerRole::Open(TagKind::Strike), "<s>")]
    #[case("</del>", MarkerRole::Close(TagKind::Strike), "</s>")]
    #[case("<B>", MarkerRole::Open(TagKind::Bold), "<b>")]
    #[case(
        r#"<pre data-language="rust">"#,
        MarkerRole::Open(TagKind::Pre),
        r#"<pre data-language="rust">"#
    )]
    #[case(
        r#"<span data-entity-type="spoiler">"#,
        MarkerRole::Open(TagKind::Spoiler),
        r#"<span data-entity-type="spoiler">"#
    )]
    #[case("<span>", MarkerRole::Open(TagKind::Spoiler), "<span>")]
    #[case("</span>", MarkerRole::Close(TagKind::Spoiler), "</span>")]
    #[case("<!--StartFragment-->", MarkerRole::Open(TagKind::Fragment), "<!--StartFragment-->")]
    #[case("<!--EndFragment-->", MarkerRole::Close(TagKind::Fragment), "<!--EndFragment-->")]
    fn classifies_known_tags(#[case] tag: &str, #[case] role: MarkerRole, #[case] text: &str) {
        let classified = classify(tag);
        assert_eq!(classified.role, role);
        assert_eq!(classified.text, text);
    }

    #[rstest]
    #[case(r#"<a href="https://x.test">"#)]
    #[case(r#"<img src="e.png" alt="smile">"#)]
    #[case(r#"<span class="emoji">"#)]
    #[case("<br>")]
    #[case("<!-- note -->")]
    fn unknown_tags_stay_raw(#[case] tag: &str) {
        let classified = classify(tag);
        assert_eq!(classified.role, MarkerRole::Raw);
        assert_eq!(classified.text, tag);
    }

    #[rstest]
    #[case("<a  href=\"x\" >", "<a href=\"x\">")]
    #[case("<a\nhref=\"x\">", "<a href=\"x\">")]
    #[case(" <b> ", "<b>")]
    #[case("<pre\tdata-language=\"c\\\">", "<pre data-language=\"c\">")]
    fn normalizes_pasted_tag_text(#[case] tag: &str, #[case] expected: &str) {
        assert_eq!(normalize_tag_text(tag), expected);
    }

    #[test]
    fn blockquote_is_not_mistaken_for_bold() {
        assert_eq!(
            classify("<blockquote>").role,
            MarkerRole::Open(TagKind::Blockquote)
        );
    }

    #[test]
    fn attribute_lookup_decodes_references() {
        let tag = r#"<a href="https://x.test/?a=1&amp;b=2" title='t'>"#;
        assert_eq!(
            attribute(tag, "href").as_deref(),
            Some("https://x.test/?a=1&b=2")
        );
        assert_eq!(attribute(tag, "title").as_deref(), Some("t"));
        assert_eq!(attribute(tag, "alt"), None);
    }

    #[test]
    fn link_and_image_detection() {
        assert!(is_link_open(r#"<a href="x">"#));
        assert!(!is_link_open("<abbr>"));
        assert!(is_link_close("</a>"));
        assert!(is_image(r#"<img alt="x">"#));
        assert!(!is_image("<i>"));
    }

    #[test]
    fn pairs_table_closes_each_kind() {
        for (name, kind) in PAIRS {
            assert_eq!(kind.close_tag(), format!("</{name}>"));
        }
    }
}
