//! Integration tests for the markup pipeline.
//!
//! Committed-path tests assert on `FormattedText`; live-path tests snapshot
//! the markup written back to the editable surface.

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::markup::{
    Entity, EntityKind, FormattedText, LiveMarkup, PLACEHOLDER, ParseOptions, entities_to_markup,
    extract, invariants, kinds::StyleKind, marker::MarkerRole, parse_for_editable,
    parse_formatted_bytes, parse_formatted_text, preprocess, reconcile, tags::TagKind, transduce,
};
use crate::error::MarkupError;

fn committed(markup: &str) -> FormattedText {
    parse_formatted_text(markup, &ParseOptions::default())
}

fn live(markup: &str, caret: usize) -> LiveMarkup {
    parse_for_editable(markup, caret, &ParseOptions::default())
}

fn entity_kind(kind: StyleKind) -> EntityKind {
    kind.tag_kind()
        .entity_kind()
        .expect("every shorthand maps to an entity")
}

// Committed path

#[rstest]
fn delimiters_balance_for_every_kind(
    #[values(
        StyleKind::Bold,
        StyleKind::Italic,
        StyleKind::Strike,
        StyleKind::Spoiler,
        StyleKind::Pre,
        StyleKind::Code
    )]
    kind: StyleKind,
) {
    let d = kind.delimiter();
    let formatted = committed(&format!("prefix{d}content{d}suffix"));
    assert_eq!(formatted.text, "prefixcontentsuffix");
    assert_eq!(formatted.entities(), &[Entity::new(entity_kind(kind), 6, 7)]);
}

#[test]
fn empty_span_collapses() {
    let formatted = committed("a**** b");
    assert_eq!(formatted, FormattedText::plain("a b"));
}

#[test]
fn sequential_shorthand_spans_are_independent() {
    let formatted = committed("**a** __b__");
    assert_eq!(formatted.text, "a b");
    assert_eq!(
        formatted.entities(),
        &[
            Entity::new(EntityKind::Bold, 0, 1),
            Entity::new(EntityKind::Italic, 2, 1),
        ]
    );
}

#[test]
fn link_markup_becomes_text_url() {
    let formatted = committed(r#"<a href="https://x.test">label</a>"#);
    assert_eq!(formatted.text, "label");
    assert_eq!(
        formatted.entities(),
        &[Entity::text_url(0, 5, "https://x.test")]
    );
}

#[test]
fn empty_tag_pair_yields_nothing() {
    assert_eq!(committed("<b></b>"), FormattedText::plain(""));
}

#[test]
fn markup_and_shorthand_mix() {
    let formatted = committed("<u>under</u> and ~~gone~~<br>next");
    assert_eq!(formatted.text, "under and gone\nnext");
    assert_eq!(
        formatted.entities(),
        &[
            Entity::new(EntityKind::Underline, 0, 5),
            Entity::new(EntityKind::Strike, 10, 4),
        ]
    );
}

#[test]
fn escaped_text_is_not_markup() {
    let formatted = committed("&lt;b&gt; **x**");
    assert_eq!(formatted.text, "<b> x");
    assert_eq!(formatted.entities(), &[Entity::new(EntityKind::Bold, 4, 1)]);
}

#[test]
fn skip_markdown_leaves_delimiters() {
    let options = ParseOptions {
        skip_markdown: true,
        ..ParseOptions::default()
    };
    assert_eq!(
        parse_formatted_text("**a**", &options),
        FormattedText::plain("**a**")
    );
}

#[test]
fn placeholders_can_be_kept() {
    let options = ParseOptions {
        strip_placeholders: false,
        ..ParseOptions::default()
    };
    let formatted = parse_formatted_text("**a** b", &options);
    assert_eq!(formatted.text, format!("a{PLACEHOLDER} b"));
    assert_eq!(formatted.entities(), &[Entity::new(EntityKind::Bold, 0, 1)]);
}

#[test]
fn stale_placeholders_are_dropped_from_committed_input() {
    let formatted = committed("<b>a</b>\u{200B}\u{200B} b");
    assert_eq!(formatted.text, "a b");
}

#[test]
fn committed_bytes_must_be_utf8() {
    let result = parse_formatted_bytes(&[b'a', 0xff], &ParseOptions::default());
    assert!(matches!(result, Err(MarkupError::InvalidUtf8(_))));
    let ok = parse_formatted_bytes(b"**a**", &ParseOptions::default()).unwrap();
    assert_eq!(ok.entities(), &[Entity::new(EntityKind::Bold, 0, 1)]);
}

#[test]
fn entities_round_trip_through_markup() {
    let formatted = committed("**bold** then `code` and ||hidden|| <i>it</i>");
    let markup = entities_to_markup(&formatted);
    assert_snapshot!(
        markup,
        @r#"<b>bold</b> then <code>code</code> and <span data-entity-type="spoiler">hidden</span> <i>it</i>"#
    );
    assert_eq!(committed(&markup), formatted);
}

#[test]
fn stages_keep_invariants() {
    let doc = extract("<b>x</b> **a** ```pre``` `c` <i>y</i>");
    invariants::check(&doc);
    let doc = transduce(doc);
    invariants::check(&doc);
    let doc = doc.strip_placeholders();
    invariants::check(&doc);
    assert_eq!(doc.text, "x a pre c y");
}

#[rstest]
#[case::bold("x**</b>y**", "xy", Entity::new(EntityKind::Bold, 1, 1))]
#[case::code("a `</code>b` c", "a b c", Entity::new(EntityKind::Code, 2, 1))]
fn stray_closing_tag_does_not_block_shorthand(
    #[case] markup: &str,
    #[case] text: &str,
    #[case] entity: Entity,
) {
    let formatted = committed(markup);
    assert_eq!(formatted.text, text);
    assert_eq!(formatted.entities(), &[entity]);
    assert_eq!(committed(&entities_to_markup(&formatted)), formatted);
}

#[test]
fn span_emptied_by_a_later_span_is_dropped() {
    let doc = transduce(extract("~~`~~`")).drop_empty_pairs();
    invariants::check(&doc);
    assert_eq!(doc.text, format!("{PLACEHOLDER}{PLACEHOLDER}"));
    let roles: Vec<_> = doc.markers.iter().map(|m| (m.role, m.position)).collect();
    assert_eq!(
        roles,
        vec![
            (MarkerRole::Open(TagKind::Code), 0),
            (MarkerRole::Close(TagKind::Code), 3),
        ]
    );
    assert_eq!(committed("~~`~~`"), FormattedText::plain(""));
}

// Live path

#[test]
fn unterminated_span_is_untouched_while_typing() {
    let result = live("**bold", 6);
    assert_snapshot!(result.markup, @"**bold");
    assert_eq!(result.caret, 6);
    assert!(!result.active_style);
}

#[test]
fn just_closed_span_stays_visible() {
    let result = live("**a**", 5);
    assert_snapshot!(result.markup, @"<b>**a**</b>");
    assert_eq!(result.caret, 3);
    assert!(result.active_style);
}

#[test]
fn leaving_a_span_finalizes_it() {
    let result = live("<b>**a**</b> x", 7);
    assert_eq!(result.markup, format!("<b>a</b>{PLACEHOLDER} x"));
    assert_eq!(result.caret, 6);
    assert!(!result.active_style);
}

#[test]
fn entering_a_styled_span_exposes_delimiters() {
    let result = live("<b>a</b> x", 1);
    assert_snapshot!(result.markup, @"<b>**a**</b> x");
    assert_eq!(result.caret, 3);
    assert!(result.active_style);
}

#[rstest]
#[case::between_trailing_chars(7, 6)]
#[case::at_end(8, 7)]
fn caret_after_finalized_span_keeps_its_neighbours(#[case] caret: usize, #[case] expected: usize) {
    // Two delimiters of two bytes removed, one three-byte placeholder added.
    let result = live("**a** bc", caret);
    assert_eq!(result.markup, format!("<b>a</b>{PLACEHOLDER} bc"));
    assert_eq!(result.caret, expected);
}

#[test]
fn caret_before_spans_never_moves() {
    let result = live("x **a** `b`", 0);
    assert_eq!(
        result.markup,
        format!("x <b>a</b>{PLACEHOLDER} <code>b</code>{PLACEHOLDER}")
    );
    assert_eq!(result.caret, 0);
}

#[test]
fn placeholder_runs_collapse() {
    let result = live("a\u{200B}\u{200B}b", 0);
    assert_eq!(result.markup, "a\u{200B}b");
}

#[test]
fn live_images_degrade_to_alt() {
    let result = live(r#"<img alt=":)"> hi"#, 3);
    assert_eq!(result.markup, ":) hi");
    assert_eq!(result.caret, 5);
}

#[test]
fn caret_past_end_is_clamped() {
    let result = live("ab", 10);
    assert_eq!(result.caret, 2);
}

#[test]
fn live_stages_keep_invariants() {
    let doc = extract("**a** <b>b</b> ~~c").with_caret(7);
    let doc = transduce(doc);
    invariants::check(&doc);
    let doc = reconcile(doc);
    invariants::check(&doc);
}

#[test]
fn live_markup_never_carries_empty_pairs() {
    let markup = "b~~`~~~~_ ````";
    for caret in 0..=markup.len() {
        let doc = extract(&preprocess::for_editable(markup)).with_caret(caret);
        let doc = reconcile(
            transduce(doc)
                .dedup_markers()
                .collapse_placeholders()
                .drop_empty_pairs(),
        );
        let empty = doc.markers.iter().enumerate().any(|(i, open)| {
            open.open_kind().is_some_and(|kind| {
                doc.markers[i + 1..]
                    .iter()
                    .any(|m| m.closes(kind) && m.position == open.position)
            })
        });
        assert!(!empty, "caret {caret}: {:?}", doc.markers);
    }
}

#[test]
fn emptied_span_is_not_written_back() {
    let result = live("~~`~~`", 0);
    assert_eq!(result.markup, format!("<code>{PLACEHOLDER}</code>"));
    assert_eq!(result.caret, 0);
}

#[test]
fn pre_block_closed_under_the_caret_gets_an_anchor() {
    let result = live("<pre>```a```</pre>", 7);
    assert_eq!(result.markup, format!("<pre>```a```</pre>{PLACEHOLDER}"));
    assert_eq!(result.caret, 7 + PLACEHOLDER.len_utf8());
    assert!(!result.active_style);
}

#[rstest]
#[case::pre("<pre>a</pre> x", "<pre>```a```</pre> x", 4)]
#[case::code("<code>a</code> x", "<code>`a`</code> x", 2)]
fn bare_span_exposes_delimiters_and_moves_caret(
    #[case] markup: &str,
    #[case] expected: &str,
    #[case] caret: usize,
) {
    let result = live(markup, 1);
    assert_eq!(result.markup, expected);
    assert_eq!(result.caret, caret);
    assert!(result.active_style);
}
