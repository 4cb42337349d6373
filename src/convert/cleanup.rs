//! Post-conversion cleanups over the whole tree.

use super::attrs::push_merging_class;
use crate::markup::{Element, Node};
use crate::utils::html::is_void_element;

const ROW_BUTTON_CELL_STYLE: &str = "text-align: center; padding: 4px;";

/// Run every cleanup; returns the number of rewrites made.
pub fn run(nodes: &mut Vec<Node>) -> usize {
    hoist_void_children(nodes) + wrap_row_buttons(nodes) + rename_residual(nodes)
}

/// Void elements cannot hold children: move them out as following siblings.
fn hoist_void_children(nodes: &mut Vec<Node>) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < nodes.len() {
        if let Node::Element(el) = &mut nodes[i] {
            if is_void_element(&el.name) && !el.children.is_empty() {
                let children = std::mem::take(&mut el.children);
                nodes.splice(i + 1..i + 1, children);
                count += 1;
            } else {
                count += hoist_void_children(&mut el.children);
            }
        }
        i += 1;
    }
    count
}

/// A row whose only content is a button gets the button in a spanning cell.
fn wrap_row_buttons(nodes: &mut [Node]) -> usize {
    let mut count = 0;
    for node in nodes {
        let Node::Element(el) = node else { continue };
        if el.is("tr") && is_lone_button(el) {
            let button = std::mem::take(&mut el.children)
                .into_iter()
                .find(|n| !n.is_blank());
            let cell = Element::new("td")
                .with_attr("colspan", "2")
                .with_attr("style", ROW_BUTTON_CELL_STYLE)
                .with_children(button.into_iter().collect());
            el.children = vec![Node::Element(cell)];
            count += 1;
        }
        count += wrap_row_buttons(&mut el.children);
    }
    count
}

fn is_lone_button(row: &Element) -> bool {
    let mut content = row.children.iter().filter(|n| !n.is_blank());
    matches!(
        (content.next(), content.next()),
        (Some(Node::Element(button)), None) if button.is("button")
    )
}

/// Custom attribute spellings left on standard tags.
fn rename_residual(nodes: &mut [Node]) -> usize {
    let mut count = 0;
    for node in nodes {
        let Node::Element(el) = node else { continue };

        if let Some(mut attr) = el.attrs.take("className") {
            attr.name = "class".to_string();
            push_merging_class(&mut el.attrs, attr);
            count += 1;
        }

        if el
            .attrs
            .get("isColumnHeader")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            el.attrs.take("isColumnHeader");
            el.attrs.set("data-column-header", "true");
            count += 1;
        }

        count += rename_residual(&mut el.children);
    }
    count
}
