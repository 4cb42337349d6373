//! HTML utility functions.
//!
//! Provides the small helpers shared by the markup tree and the serve pages:
//! - `escape()`, `escape_text()` - entity escaping for pages and synthesized text
//! - `is_void_element()` - elements that never carry children (input, img, ...)
//! - `is_raw_text_element()` - elements whose content is not markup (script, style)
//! - `merge_class()` - class list concatenation without duplicates
//! - `inline_script()`, `inline_style()` - raw text safe to place in `<script>`/`<style>`

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters for display in a page.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &['<', '>', '&', '"', '\''])
}

/// Escape only the characters that would open or close a tag.
///
/// Attribute values moved into element content keep their entities as
/// written, so `&` is left alone here.
#[inline]
pub fn escape_text(s: &str) -> Cow<'_, str> {
    escape_with(s, &['<', '>'])
}

fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c).filter(|_| chars.contains(&c)) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if an HTML tag is a void element.
///
/// Void elements are written without a closing tag and cannot have children.
/// Matching is ASCII case-insensitive.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    const VOID: [&str; 13] = [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
        "track", "wbr",
    ];
    VOID.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// Check if tag is a raw text element (content is not parsed as markup).
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("script") || tag.eq_ignore_ascii_case("style")
}

// =============================================================================
// Class Lists
// =============================================================================

/// Append `extra` classes to `base`, skipping empties and duplicates.
///
/// Order is preserved: base classes first, then new ones in their order.
pub fn merge_class(base: &str, extra: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for class in base.split_whitespace().chain(extra.split_whitespace()) {
        if !out.contains(&class) {
            out.push(class);
        }
    }
    out.join(" ")
}

// =============================================================================
// Inline Raw Text
// =============================================================================

/// Make `js` safe to embed between `<script>` tags.
pub fn inline_script(js: &str) -> Cow<'_, str> {
    break_closing_tag(js, "</script")
}

/// Make `css` safe to embed between `<style>` tags.
pub fn inline_style(css: &str) -> Cow<'_, str> {
    break_closing_tag(css, "</style")
}

/// `</tag` becomes `<\/tag`, case-insensitively.
fn break_closing_tag<'a>(s: &'a str, needle: &str) -> Cow<'a, str> {
    let lower = s.to_ascii_lowercase();
    if !lower.contains(needle) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    let mut last = 0;
    for (at, _) in lower.match_indices(needle) {
        out.push_str(&s[last..at]);
        out.push_str("<\\/");
        last = at + 2;
    }
    out.push_str(&s[last..]);
    Cow::Owned(out)
}

// =============================================================================
// Tests
// =============================================================================
