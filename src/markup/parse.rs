//! Tolerant markup parser.
//!
//! Recovers from the usual hand-written markup mistakes instead of failing:
//! unknown closers are kept verbatim, elements left open are closed at the
//! end of their parent, and closers of void elements are dropped. Only
//! input that cannot be tokenized at all is an error.

use super::{Attribute, Attributes, Document, Element, Node};
use crate::utils::html::{is_raw_text_element, is_void_element};
use thiserror::Error;

/// Deepest element nesting accepted before the document is rejected.
pub const MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("unterminated tag `<{name}` at byte {offset}")]
    UnterminatedTag { name: String, offset: usize },

    #[error("unterminated comment at byte {offset}")]
    UnterminatedComment { offset: usize },

    #[error("elements nested deeper than {MAX_DEPTH} levels at byte {offset}")]
    TooDeep { offset: usize },
}

pub(super) struct Parser<'a> {
    src: &'a str,
    pos: usize,
    root: Vec<Node>,
    stack: Vec<Element>,
    dropped_void_closers: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            root: Vec::new(),
            stack: Vec::new(),
            dropped_void_closers: 0,
        }
    }

    pub(super) fn parse(mut self) -> Result<Document, MarkupError> {
        let src = self.src;
        let bytes = src.as_bytes();

        while self.pos < bytes.len() {
            let Some(lt) = src[self.pos..].find('<').map(|i| i + self.pos) else {
                self.push_text(&src[self.pos..]);
                break;
            };
            if lt > self.pos {
                self.push_text(&src[self.pos..lt]);
            }
            self.pos = lt;

            let rest = &src[lt..];
            if rest.starts_with("<!--") {
                self.parse_comment()?;
            } else if rest.starts_with("</") {
                self.parse_closer()?;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.parse_declaration()?;
            } else if rest.as_bytes().get(1).is_some_and(u8::is_ascii_alphabetic) {
                self.parse_start_tag()?;
            } else {
                self.push_text("<");
                self.pos += 1;
            }
        }

        while !self.stack.is_empty() {
            self.close_top();
        }

        Ok(Document {
            children: self.root,
            dropped_void_closers: self.dropped_void_closers,
        })
    }

    // =========================================================================
    // Tree building
    // =========================================================================

    fn current(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(top) => &mut top.children,
            None => &mut self.root,
        }
    }

    fn append(&mut self, node: Node) {
        self.current().push(node);
    }

    fn push_text(&mut self, text: &str) {
        let nodes = self.current();
        if let Some(Node::Text(last)) = nodes.last_mut() {
            last.push_str(text);
        } else {
            nodes.push(Node::text(text));
        }
    }

    fn close_top(&mut self) {
        if let Some(el) = self.stack.pop() {
            self.append(Node::Element(el));
        }
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    fn parse_comment(&mut self) -> Result<(), MarkupError> {
        let src = self.src;
        let start = self.pos + 4;
        let end = src[start..]
            .find("-->")
            .map(|i| i + start)
            .ok_or(MarkupError::UnterminatedComment { offset: self.pos })?;
        self.append(Node::Comment(src[start..end].to_string()));
        self.pos = end + 3;
        Ok(())
    }

    fn parse_declaration(&mut self) -> Result<(), MarkupError> {
        let src = self.src;
        let gt = self.find_gt(self.pos, "!")?;
        self.append(Node::Doctype(src[self.pos + 1..gt].to_string()));
        self.pos = gt + 1;
        Ok(())
    }

    fn parse_closer(&mut self) -> Result<(), MarkupError> {
        let src = self.src;
        let name_start = self.pos + 2;
        let name_end = scan_name(src, name_start);
        if name_end == name_start {
            self.push_text("</");
            self.pos += 2;
            return Ok(());
        }

        let name = &src[name_start..name_end];
        let gt = self.find_gt(name_end, name)?;
        let raw = &src[self.pos..=gt];
        self.pos = gt + 1;

        if is_void_element(name) {
            self.dropped_void_closers += 1;
            return Ok(());
        }

        match self.stack.iter().rposition(|el| el.is(name)) {
            Some(index) => {
                while self.stack.len() > index {
                    self.close_top();
                }
            }
            None => self.append(Node::Raw(raw.to_string())),
        }
        Ok(())
    }

    fn parse_start_tag(&mut self) -> Result<(), MarkupError> {
        let src = self.src;
        let offset = self.pos;
        let bytes = src.as_bytes();
        let name_end = scan_name(src, offset + 1);
        let name = &src[offset + 1..name_end];

        let unterminated = || MarkupError::UnterminatedTag {
            name: name.to_string(),
            offset,
        };

        let mut attrs = Attributes::new();
        let mut self_closing = false;
        let mut i = name_end;

        loop {
            i = skip_ws(bytes, i);
            match bytes.get(i) {
                None => return Err(unterminated()),
                Some(b'>') => {
                    i += 1;
                    break;
                }
                Some(b'/') if bytes.get(i + 1) == Some(&b'>') => {
                    self_closing = true;
                    i += 2;
                    break;
                }
                Some(b'/' | b'=' | b'"' | b'\'') => {
                    i += 1;
                    continue;
                }
                Some(_) => {}
            }

            let attr_start = i;
            while let Some(&b) = bytes.get(i) {
                if b.is_ascii_whitespace()
                    || b == b'='
                    || b == b'>'
                    || (b == b'/' && bytes.get(i + 1) == Some(&b'>'))
                {
                    break;
                }
                i += 1;
            }
            let attr_name = &src[attr_start..i];

            let after_name = skip_ws(bytes, i);
            if bytes.get(after_name) != Some(&b'=') {
                attrs.push(Attribute::flag(attr_name));
                continue;
            }

            i = skip_ws(bytes, after_name + 1);
            let value = match bytes.get(i) {
                None => return Err(unterminated()),
                Some(&(q @ (b'"' | b'\''))) => {
                    let close = src[i + 1..]
                        .find(q as char)
                        .map(|p| p + i + 1)
                        .ok_or_else(unterminated)?;
                    let value = &src[i + 1..close];
                    i = close + 1;
                    value
                }
                Some(_) => {
                    let value_start = i;
                    while let Some(&b) = bytes.get(i) {
                        if b.is_ascii_whitespace() || b == b'>' {
                            break;
                        }
                        i += 1;
                    }
                    &src[value_start..i]
                }
            };
            attrs.push(Attribute::new(attr_name, value));
        }

        self.pos = i;
        let mut element = Element::new(name).with_attrs(attrs);
        element.self_closing = self_closing;

        if self_closing || is_void_element(name) {
            self.append(Node::Element(element));
        } else if is_raw_text_element(name) {
            self.parse_raw_text(element);
        } else {
            if self.stack.len() >= MAX_DEPTH {
                return Err(MarkupError::TooDeep { offset });
            }
            self.stack.push(element);
        }
        Ok(())
    }

    /// Content of `script`/`style` runs to the matching closer (or EOF).
    fn parse_raw_text(&mut self, mut element: Element) {
        let src = self.src;
        let closer = format!("</{}", element.name.to_ascii_lowercase());
        let rest = &src[self.pos..];
        let (content_end, next) = match rest.to_ascii_lowercase().find(&closer) {
            Some(i) => {
                let end = self.pos + i;
                let after = src[end..]
                    .find('>')
                    .map_or(src.len(), |gt| end + gt + 1);
                (end, after)
            }
            None => (src.len(), src.len()),
        };

        let content = &src[self.pos..content_end];
        if !content.is_empty() {
            element.children.push(Node::text(content));
        }
        self.pos = next;
        self.append(Node::Element(element));
    }

    fn find_gt(&self, from: usize, name: &str) -> Result<usize, MarkupError> {
        self.src[from..]
            .find('>')
            .map(|i| i + from)
            .ok_or_else(|| MarkupError::UnterminatedTag {
                name: name.to_string(),
                offset: self.pos,
            })
    }
}

fn scan_name(src: &str, from: usize) -> usize {
    let bytes = src.as_bytes();
    let mut i = from;
    while bytes
        .get(i)
        .is_some_and(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.'))
    {
        i += 1;
    }
    i
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Document {
        Document::parse(src).unwrap()
    }

    fn first(doc: &Document) -> &Element {
        doc.children.iter().find_map(Node::as_element).unwrap()
    }

    #[test]
    fn test_attribute_forms() {
        let doc = parse(r#"<XInput id="a" class='b c' size=small disabled/>"#);
        let el = first(&doc);
        assert_eq!(el.name, "XInput");
        assert!(el.self_closing);
        assert_eq!(el.attrs.get("id"), Some("a"));
        assert_eq!(el.attrs.get("class"), Some("b c"));
        assert_eq!(el.attrs.get("size"), Some("small"));
        assert_eq!(el.attrs.get("disabled"), Some(""));
    }

    #[test]
    fn test_quoted_value_may_contain_gt() {
        let doc = parse(r#"<div title="a > b">x</div>"#);
        assert_eq!(first(&doc).attrs.get("title"), Some("a > b"));
        assert_eq!(first(&doc).text_content(), "x");
    }

    #[test]
    fn test_case_insensitive_closer() {
        let doc = parse("<XButton>Go</XBUTTON><p>after</p>");
        let el = first(&doc);
        assert_eq!(el.text_content(), "Go");
        assert_eq!(doc.children.len(), 2);
    }

    #[test]
    fn test_void_closer_dropped() {
        let doc = parse(r#"<input id="a"></input>"#);
        assert_eq!(doc.children.len(), 1);
        assert_eq!(doc.dropped_void_closers, 1);
    }

    #[test]
    fn test_stray_closer_kept_verbatim() {
        let doc = parse("a</XSpan>b");
        assert_eq!(
            doc.children,
            vec![
                Node::text("a"),
                Node::Raw("</XSpan>".into()),
                Node::text("b")
            ]
        );
    }

    #[test]
    fn test_unclosed_elements_close_implicitly() {
        let doc = parse("<div><span>text</div>tail");
        let div = first(&doc);
        assert_eq!(div.child_elements().count(), 1);
        assert_eq!(doc.children.last(), Some(&Node::text("tail")));
    }

    #[test]
    fn test_raw_text_not_parsed() {
        let doc = parse("<script>if (a<b) { x('<XButton>'); }</script><p>x</p>");
        let script = first(&doc);
        assert_eq!(script.text_content(), "if (a<b) { x('<XButton>'); }");
        assert_eq!(doc.children.len(), 2);
    }

    #[test]
    fn test_lone_lt_is_text() {
        let doc = parse("a < b <3");
        assert_eq!(doc.children, vec![Node::text("a < b <3")]);
    }

    #[test]
    fn test_doctype_and_comment() {
        let doc = parse("<!DOCTYPE html><!-- note --><html></html>");
        assert_eq!(doc.children[0], Node::Doctype("!DOCTYPE html".into()));
        assert_eq!(doc.children[1], Node::Comment(" note ".into()));
    }

    #[test]
    fn test_unterminated_tag_is_error() {
        let err = Document::parse("<div><XButton text=\"a\"").unwrap_err();
        assert_eq!(
            err,
            MarkupError::UnterminatedTag {
                name: "XButton".into(),
                offset: 5
            }
        );
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        assert!(matches!(
            Document::parse("<div title=\"oops>text</div>"),
            Err(MarkupError::UnterminatedTag { .. })
        ));
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        assert_eq!(
            Document::parse("ok <!-- never closed").unwrap_err(),
            MarkupError::UnterminatedComment { offset: 3 }
        );
    }

    #[test]
    fn test_depth_limit() {
        let deep = "<div>".repeat(MAX_DEPTH + 1);
        assert!(matches!(
            Document::parse(&deep),
            Err(MarkupError::TooDeep { .. })
        ));
        assert!(Document::parse(&"<div>".repeat(MAX_DEPTH)).is_ok());
    }

    #[test]
    fn test_utf8_text_and_attrs() {
        let doc = parse(r#"<XLabel title="게인">비례 게인</XLabel>"#);
        assert_eq!(first(&doc).attrs.get("title"), Some("게인"));
        assert_eq!(first(&doc).text_content(), "비례 게인");
    }
}
