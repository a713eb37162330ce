//! Markup escaping and highlight rendering.
//!
//! Text is always escaped before highlight spans are wrapped, so a query (or
//! a catalog field) can never be interpreted as structural markup.

use std::borrow::Cow;
use std::ops::Range;

/// Escape `&`, `<`, `>`, `"`, and `'` for safe embedding in markup.
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    html_escape::encode_safe(text)
}

/// Render `text` as escaped markup with every span wrapped in
/// `<mark>…</mark>`. Spans must be sorted, non-overlapping byte ranges into
/// `text` (as produced by [`super::search::find_spans`]); the surrounding
/// text keeps its original case and line breaks.
pub fn highlight_markup(text: &str, spans: &[Range<usize>]) -> String {
    if spans.is_empty() {
        return escape_markup(text).into_owned();
    }
    let mut out = String::with_capacity(text.len() + spans.len() * "<mark></mark>".len());
    let mut pos = 0;
    for span in spans {
        out.push_str(&escape_markup(&text[pos..span.start]));
        out.push_str("<mark>");
        out.push_str(&escape_markup(&text[span.start..span.end]));
        out.push_str("</mark>");
        pos = span.end;
    }
    out.push_str(&escape_markup(&text[pos..]));
    out
}
