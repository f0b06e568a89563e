//! Markup normalization applied before extraction.
//!
//! Editable surfaces wrap lines in `<div>`s and `<br>`s and spell spaces as
//! `&nbsp;`; these are folded into plain newlines and spaces here so the
//! extractor only sees inline markup.

use std::sync::OnceLock;

use regex::Regex;

use super::document::PLACEHOLDER;

fn line_break_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"&nbsp;", " "),
            (r"<div><br[^>]*></div>", "\n"),
            (r"<br[^>]*>", "\n"),
            (r"</div>\s*<div>", "\n"),
            (r"<div>", "\n"),
            (r"</div>", ""),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("Invalid line break regex"),
                replacement,
            )
        })
        .collect()
    })
}

/// Folds block-level line structure into newlines.
pub fn normalize_lines(markup: &str) -> String {
    line_break_rules()
        .iter()
        .fold(markup.to_string(), |acc, (regex, replacement)| {
            regex.replace_all(&acc, *replacement).into_owned()
        })
}

/// Committed messages: line normalization plus removal of every placeholder
/// left over from earlier live passes.
pub fn for_committed(markup: &str) -> String {
    normalize_lines(markup).replace(PLACEHOLDER, "")
}

/// Live editing: line normalization plus collapsing placeholder runs to one.
pub fn for_editable(markup: &str) -> String {
    let mut out = normalize_lines(markup);
    let doubled: String = [PLACEHOLDER, PLACEHOLDER].iter().collect();
    while out.contains(&doubled) {
        out = out.replace(&doubled, &PLACEHOLDER.to_string());
    }
    out
}
