//! Structural conversions for components that are more than a rename.

use super::attrs::{push_merging_class, rewrite};
use super::rules::{ComponentKind, ComponentRule, ToggleKind};
use crate::markup::{Attribute, Attributes, Element, Node};
use crate::utils::html::{escape_text, merge_class};

/// Convert one special component. Returns the replacement nodes; void
/// targets hand back their children as following siblings.
pub fn convert(el: Element, rule: &ComponentRule) -> Vec<Node> {
    match rule.kind {
        ComponentKind::Clickable => vec![Node::Element(clickable(el, rule))],
        ComponentKind::TextInput => text_input(el, rule),
        ComponentKind::WrappedInput(kind) => vec![Node::Element(wrapped_input(el, kind))],
        ComponentKind::Range => vec![Node::Element(range(el))],
        ComponentKind::OptionList => vec![Node::Element(option_list(el, rule))],
        ComponentKind::Option => vec![Node::Element(option(el))],
        ComponentKind::Direct => vec![Node::Element(el)],
    }
}

// ============================================================================
// Visibility
// ============================================================================

/// Resolved `visible` attribute. Only a literal `false` hides.
fn take_visible(attrs: &mut Attributes) -> bool {
    attrs
        .take_value("visible")
        .is_none_or(|v| !v.trim().eq_ignore_ascii_case("false"))
}

fn visibility_class(rule: &ComponentRule, visible: bool) -> String {
    let state = if visible { "show" } else { "hide" };
    format!("{}-visible-{state}", rule.class_prefix())
}

/// User classes from both `class` and `className`, in source order.
fn take_user_class(attrs: &mut Attributes) -> String {
    let is_class = |a: &Attribute| {
        a.name.eq_ignore_ascii_case("class") || a.name.eq_ignore_ascii_case("className")
    };
    let class = attrs
        .iter()
        .filter(|a| is_class(*a))
        .fold(String::new(), |acc, a| merge_class(&acc, a.value_str()));
    attrs.retain(|a| !is_class(a));
    class
}

/// Final attribute list: `class` first, rewritten rest, then `data-visible`.
fn assemble(class: String, rest: Attributes, visible: Option<bool>) -> Attributes {
    let mut out = Attributes::new();
    if !class.is_empty() {
        out.push(Attribute::new("class", class));
    }
    for attr in rewrite(rest) {
        push_merging_class(&mut out, attr);
    }
    if let Some(visible) = visible {
        out.push(Attribute::new("data-visible", visible.to_string()));
    }
    out
}

// ============================================================================
// Kinds
// ============================================================================

fn clickable(el: Element, rule: &ComponentRule) -> Element {
    let mut attrs = el.attrs;
    let text = attrs.take_value("text");
    let ty = attrs
        .take_value("type")
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "default".to_string());
    let small = attrs
        .take_value("size")
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("small"));
    let visible = take_visible(&mut attrs);
    let user = take_user_class(&mut attrs);

    let mut class = format!("btn {ty}");
    if small {
        class.push_str(" small");
    }
    class.push(' ');
    class.push_str(&visibility_class(rule, visible));
    let class = merge_class(&class, &user);

    let children = match text {
        Some(text) => vec![Node::text(escape_text(&text))],
        None => el.children,
    };

    Element::new(rule.target)
        .with_attrs(assemble(class, attrs, Some(visible)))
        .with_children(children)
}

fn text_input(el: Element, rule: &ComponentRule) -> Vec<Node> {
    let mut attrs = el.attrs;
    let visible = take_visible(&mut attrs);
    let user = take_user_class(&mut attrs);
    let class = merge_class(&visibility_class(rule, visible), &user);

    let mut input = Element::new(rule.target).with_attrs(assemble(class, attrs, Some(visible)));
    input.self_closing = el.self_closing;

    let mut nodes = vec![Node::Element(input)];
    nodes.extend(el.children);
    nodes
}

fn wrapped_input(el: Element, kind: ToggleKind) -> Element {
    let kind_name = kind.as_str();
    let mut attrs = el.attrs;
    attrs.take("type");

    let disabled = attrs.has("disabled");
    let checked = attrs.has("checked");

    let mut input_attrs = Attributes::new();
    input_attrs.push(Attribute::new("type", kind_name));
    for attr in rewrite(attrs) {
        push_merging_class(&mut input_attrs, attr);
    }
    input_attrs.push(Attribute::flag("hidden"));

    let mut label_class = kind.label_class().to_string();
    if disabled {
        label_class.push_str(" disabled");
    }
    let mut icon_class = kind.icon_class().to_string();
    if checked {
        icon_class.push_str(" checked");
    }

    Element::new("label")
        .with_attr("class", label_class)
        .with_children(vec![
            Node::Element(Element::new("input").with_attrs(input_attrs)),
            Node::Element(Element::new("span").with_attr("class", icon_class)),
            Node::Element(
                Element::new("span")
                    .with_attr("class", kind.text_class())
                    .with_children(el.children),
            ),
        ])
}

fn range(el: Element) -> Element {
    let mut attrs = el.attrs;
    attrs.take("type");

    let mut out = Attributes::new();
    out.push(Attribute::new("type", "range"));
    for attr in rewrite(attrs) {
        push_merging_class(&mut out, attr);
    }
    Element::new("input").with_attrs(out)
}

fn option_list(el: Element, rule: &ComponentRule) -> Element {
    Element::new(rule.target)
        .with_attrs(rewrite(el.attrs))
        .with_children(el.children)
}

fn option(el: Element) -> Element {
    let mut attrs = el.attrs;
    let label = attrs.take_value("label").unwrap_or_default();
    let children = if label.is_empty() {
        Vec::new()
    } else {
        vec![Node::text(escape_text(&label))]
    };
    Element::new("option")
        .with_attrs(rewrite(attrs))
        .with_children(children)
}
