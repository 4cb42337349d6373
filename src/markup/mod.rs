//! Tolerant markup tree for RodiX documents.
//!
//! Documents are parsed into a tree of elements with ordered attribute
//! lists, rewritten by the converter passes, and serialized back.
//!
//! ```text
//! &str ──parse──▶ Document { Vec<Node> } ──passes──▶ Document ──to_html──▶ String
//! ```
//!
//! The parser keeps attribute values and text exactly as written (entities
//! are not decoded), so untouched markup round-trips byte-for-byte apart
//! from closers that the tree makes explicit.

mod parse;
mod serialize;

pub use parse::{MAX_DEPTH, MarkupError};

// =============================================================================
// Attributes
// =============================================================================

/// A single attribute. `value` is `None` for bare boolean attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Value as text; boolean attributes read as the empty string.
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Ordered attribute list with ASCII case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Value of `name`, `Some("")` for boolean attributes.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.0[i].value_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove and return the first attribute called `name`.
    pub fn take(&mut self, name: &str) -> Option<Attribute> {
        self.position(name).map(|i| self.0.remove(i))
    }

    /// Remove `name` and return its value as text.
    pub fn take_value(&mut self, name: &str) -> Option<String> {
        self.take(name).map(|a| a.value.unwrap_or_default())
    }

    /// Replace the value of `name` in place, or append it.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(i) => self.0[i].value = Some(value.into()),
            None => self.0.push(Attribute::new(name, value)),
        }
    }

    pub fn retain(&mut self, f: impl FnMut(&Attribute) -> bool) {
        self.0.retain(f);
    }

    pub fn push(&mut self, attr: Attribute) {
        self.0.push(attr);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Attribute> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Attribute> for Attributes {
    fn extend<I: IntoIterator<Item = Attribute>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Attributes {
    type Item = Attribute;
    type IntoIter = std::vec::IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// =============================================================================
// Nodes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Text exactly as written (entities kept).
    Text(String),
    /// Comment body without `<!--` / `-->`.
    Comment(String),
    /// Declaration body without `<` / `>`, e.g. `!DOCTYPE html`.
    Doctype(String),
    /// Markup kept verbatim, such as a closing tag with no open element.
    Raw(String),
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Whitespace-only text nodes are layout noise for structural checks.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(t) if t.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written in the source.
    pub name: String,
    pub attrs: Attributes,
    pub children: Vec<Node>,
    /// Written as `<tag ... />` in the source.
    pub self_closing: bool,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.set(name, value);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => collect_text(&el.children, out),
            _ => {}
        }
    }
}

// =============================================================================
// Document
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<Node>,
    /// Closing tags of void elements dropped while parsing (`<input></input>`).
    pub dropped_void_closers: usize,
}

impl Document {
    /// Parse a document. See [`MarkupError`] for the failure cases.
    pub fn parse(source: &str) -> Result<Self, MarkupError> {
        parse::Parser::new(source).parse()
    }

    /// Serialize the tree back to markup.
    pub fn to_html(&self) -> String {
        serialize::to_html(&self.children)
    }

    /// Depth-first search for the first element matching `pred`.
    pub fn find(&self, pred: impl Fn(&Element) -> bool) -> Option<&Element> {
        find_in(&self.children, &pred)
    }

    /// Mutable variant of [`Document::find`].
    pub fn find_mut(&mut self, pred: impl Fn(&Element) -> bool) -> Option<&mut Element> {
        find_in_mut(&mut self.children, &pred)
    }

    /// Visit every element, parents before children.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        walk_nodes_mut(&mut self.children, f);
    }
}

fn find_in<'a>(nodes: &'a [Node], pred: &impl Fn(&Element) -> bool) -> Option<&'a Element> {
    for node in nodes {
        if let Node::Element(el) = node {
            if pred(el) {
                return Some(el);
            }
            if let Some(found) = find_in(&el.children, pred) {
                return Some(found);
            }
        }
    }
    None
}

fn find_in_mut<'a>(
    nodes: &'a mut [Node],
    pred: &impl Fn(&Element) -> bool,
) -> Option<&'a mut Element> {
    for node in nodes {
        if let Node::Element(el) = node {
            if pred(el) {
                return Some(el);
            }
            if let Some(found) = find_in_mut(&mut el.children, pred) {
                return Some(found);
            }
        }
    }
    None
}

fn walk_nodes_mut(nodes: &mut [Node], f: &mut impl FnMut(&mut Element)) {
    for node in nodes {
        if let Node::Element(el) = node {
            f(el);
            walk_nodes_mut(&mut el.children, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_case_insensitive() {
        let mut attrs = Attributes::new();
        attrs.push(Attribute::new("className", "a"));
        attrs.push(Attribute::flag("disabled"));

        assert_eq!(attrs.get("classname"), Some("a"));
        assert_eq!(attrs.get("DISABLED"), Some(""));
        assert!(attrs.get("id").is_none());

        attrs.set("CLASSNAME", "b");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.take_value("className").as_deref(), Some("b"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_text_content_nested() {
        let doc = Document::parse("<div>a<b>b</b><!-- c -->d</div>").unwrap();
        let div = doc.find(|el| el.is("div")).unwrap();
        assert_eq!(div.text_content(), "abd");
    }

    #[test]
    fn test_find_mut_and_walk() {
        let mut doc = Document::parse("<div><span id=\"x\"></span><span></span></div>").unwrap();
        doc.find_mut(|el| el.attrs.get("id") == Some("x"))
            .unwrap()
            .attrs
            .set("class", "hit");

        let mut count = 0;
        doc.walk_mut(&mut |el| {
            if el.is("span") {
                count += 1;
            }
        });
        assert_eq!(count, 2);
        assert!(doc.to_html().contains("class=\"hit\""));
    }
}
