// ABOUTME: Offset-based scanner for <script> elements in possibly malformed HTML.
// ABOUTME: Locates opening tags, reads their id attribute and brackets the raw content.

//! Script element scanner.
//!
//! Works purely on byte offsets of the decoded text, so unterminated or
//! improperly nested markup never causes a failure:
//! - Opening tags are `<script ...>` with the tag name matched case-insensitively.
//! - The `id` attribute value is returned verbatim; callers compare it exactly.
//! - Content runs from the end of the opening tag to the nearest `</script`,
//!   `<script` or `</body` marker, or to the end of the text.

use std::ops::Range;

use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use regex::Regex;

// a '>' inside a quoted attribute value does not close the tag
static SCRIPT_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<script\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).unwrap()
});

// one attribute: name, then an optional double-quoted, single-quoted or bare value
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).unwrap()
});

static CONTENT_END: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostFirst)
        .build(["</script", "<script", "</body"])
        .unwrap()
});

/// One opening script tag and the content bracketed after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSpan<'a> {
    /// Value of the `id` attribute, if the tag has one.
    pub id: Option<&'a str>,
    /// Byte range of the opening tag itself.
    pub tag: Range<usize>,
    /// Byte range of the untrimmed content.
    pub content: Range<usize>,
}

impl<'a> ScriptSpan<'a> {
    /// The content text with surrounding whitespace removed.
    pub fn text(&self, source: &'a str) -> &'a str {
        source[self.content.clone()].trim()
    }
}

/// Iterates over every opening script tag in document order.
pub fn scan_scripts(text: &str) -> impl Iterator<Item = ScriptSpan<'_>> + '_ {
    SCRIPT_OPEN.find_iter(text).map(move |open| {
        // attributes sit between "<script" and the closing '>'
        let attrs = &text[open.start() + "<script".len()..open.end() - 1];
        let start = open.end();
        let end = content_end(text, start);
        ScriptSpan {
            id: id_attribute(attrs),
            tag: open.range(),
            content: start..end,
        }
    })
}

fn content_end(text: &str, start: usize) -> usize {
    CONTENT_END
        .find(aho_corasick::Input::new(text).span(start..text.len()))
        .map(|m| m.start())
        .unwrap_or(text.len())
}

/// Walks the attributes in order so text inside quoted values is never read as a name.
fn id_attribute(attrs: &str) -> Option<&str> {
    ATTRIBUTE
        .captures_iter(attrs)
        .find(|caps| caps[1].eq_ignore_ascii_case("id"))
        .map(|caps| {
            caps.get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str())
        })
}
