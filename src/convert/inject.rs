//! Layout stylesheet injection.

use crate::markup::{Document, Element, Node};

pub const LAYOUT_STYLE_ID: &str = "rodix-layout";

const LAYOUT_CSS: &str = include_str!("../embed/css/layout.css");

/// Insert the layout `<style>` block into `head`, or at the top of the
/// document (after any doctype) when there is no head.
///
/// Returns `false` when the block is already present.
pub fn inject_layout(doc: &mut Document) -> bool {
    let present = doc
        .find(|el| el.is("style") && el.attrs.get("id") == Some(LAYOUT_STYLE_ID))
        .is_some();
    if present {
        return false;
    }

    let style = Node::Element(
        Element::new("style")
            .with_attr("id", LAYOUT_STYLE_ID)
            .with_children(vec![Node::text(format!("\n{LAYOUT_CSS}"))]),
    );

    if let Some(head) = doc.find_mut(|el| el.is("head")) {
        head.children.push(style);
    } else {
        let at = doc
            .children
            .iter()
            .take_while(|n| matches!(n, Node::Doctype(_)) || n.is_blank())
            .count();
        doc.children.insert(at, style);
    }
    true
}
