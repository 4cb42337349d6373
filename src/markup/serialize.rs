//! Markup serializer.

use super::{Attribute, Element, Node};
use crate::utils::html::is_void_element;

pub(super) fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_nodes(nodes, &mut out);
    out
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Element(el) => write_element(el, out),
            Node::Text(t) | Node::Raw(t) => out.push_str(t),
            Node::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
            Node::Doctype(d) => {
                out.push('<');
                out.push_str(d);
                out.push('>');
            }
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for attr in el.attrs.iter() {
        write_attr(attr, out);
    }

    if is_void_element(&el.name) {
        out.push_str(if el.self_closing { " />" } else { ">" });
        // Void elements cannot hold children; anything attached follows them.
        write_nodes(&el.children, out);
        return;
    }

    if el.self_closing && el.children.is_empty() {
        out.push_str(" />");
        return;
    }

    out.push('>');
    write_nodes(&el.children, out);
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

fn write_attr(attr: &Attribute, out: &mut String) {
    out.push(' ');
    out.push_str(&attr.name);
    if let Some(value) = &attr.value {
        let quote = if value.contains('"') { '\'' } else { '"' };
        out.push('=');
        out.push(quote);
        out.push_str(value);
        out.push(quote);
    }
}

#[cfg(test)]
mod tests {
    use crate::markup::{Document, Element, Node};

    fn roundtrip(src: &str) -> String {
        Document::parse(src).unwrap().to_html()
    }

    #[test]
    fn test_plain_markup_unchanged() {
        let src = r#"<!DOCTYPE html><div class="a" hidden><p>x &amp; y</p><!-- c --></div>"#;
        assert_eq!(roundtrip(src), src);
    }

    #[test]
    fn test_void_and_self_closing() {
        assert_eq!(roundtrip("<br><input id=\"a\" />"), "<br><input id=\"a\" />");
        assert_eq!(roundtrip("<XSpan text=\"a\"/>"), "<XSpan text=\"a\" />");
    }

    #[test]
    fn test_void_closer_removed() {
        assert_eq!(roundtrip("<input></input>"), "<input>");
    }

    #[test]
    fn test_implicit_closers_written() {
        assert_eq!(roundtrip("<div><span>a</div>"), "<div><span>a</span></div>");
    }

    #[test]
    fn test_quote_choice() {
        let el = Element::new("div").with_attr("data-x", r#"say "hi""#);
        let doc = Document {
            children: vec![Node::Element(el)],
            ..Default::default()
        };
        assert_eq!(doc.to_html(), r#"<div data-x='say "hi"'></div>"#);
    }

    #[test]
    fn test_single_quoted_source_normalized() {
        assert_eq!(roundtrip("<div id='a'></div>"), "<div id=\"a\"></div>");
    }

    #[test]
    fn test_script_content_verbatim() {
        let src = "<script>if (a < b && c > d) {}</script>";
        assert_eq!(roundtrip(src), src);
    }
}
