//! Attribute normalization.
//!
//! Custom attribute spellings are renamed by a static table. Names match
//! case-insensitively; anything not in the table passes through untouched.

use crate::markup::{Attribute, Attributes};
use crate::utils::html::merge_class;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    Keep,
    Fixed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRewrite {
    pub source: &'static str,
    pub target: &'static str,
    pub value: ValueTransform,
}

const fn keep(source: &'static str, target: &'static str) -> AttributeRewrite {
    AttributeRewrite {
        source,
        target,
        value: ValueTransform::Keep,
    }
}

pub const ATTRIBUTE_REWRITES: &[AttributeRewrite] = &[
    keep("className", "class"),
    keep("isColumnHeader", "data-column-header"),
    keep("isHeader", "data-header"),
    keep("htmlFor", "for"),
    keep("searchMode", "data-search-mode"),
    keep("useAddButton", "data-use-add-button"),
    keep("useDeleteButton", "data-use-delete-button"),
    AttributeRewrite {
        source: "selected",
        target: "selected",
        value: ValueTransform::Fixed("selected"),
    },
];

fn find_rewrite(name: &str) -> Option<&'static AttributeRewrite> {
    ATTRIBUTE_REWRITES
        .iter()
        .find(|r| r.source.eq_ignore_ascii_case(name))
}

/// Apply one rewrite; `None` when the attribute is not in the table.
pub fn rewrite_one(attr: &Attribute) -> Option<Attribute> {
    let rule = find_rewrite(&attr.name)?;
    let value = match rule.value {
        ValueTransform::Keep => attr.value.clone(),
        ValueTransform::Fixed(v) => Some(v.to_string()),
    };
    Some(Attribute {
        name: rule.target.to_string(),
        value,
    })
}

/// Rewrite every attribute in order. A renamed `class` is merged into an
/// existing one instead of producing a duplicate.
pub fn rewrite(attrs: Attributes) -> Attributes {
    let mut out = Attributes::new();
    for attr in attrs {
        let attr = rewrite_one(&attr).unwrap_or(attr);
        push_merging_class(&mut out, attr);
    }
    out
}

/// [`rewrite`] followed by `type` promotion: a surviving `type="x"` is
/// removed and `btn x` is merged in front of the class list.
pub fn rewrite_with_promotion(attrs: Attributes) -> Attributes {
    let mut out = rewrite(attrs);
    if let Some(ty) = out.take_value("type") {
        let class = merge_class(&format!("btn {ty}"), out.get("class").unwrap_or(""));
        let mut promoted = Attributes::new();
        promoted.push(Attribute::new("class", class));
        promoted.extend(out.into_iter().filter(|a| !a.name.eq_ignore_ascii_case("class")));
        return promoted;
    }
    out
}

pub(super) fn push_merging_class(out: &mut Attributes, attr: Attribute) {
    if attr.name.eq_ignore_ascii_case("class") {
        if let Some(existing) = out.get("class") {
            let merged = merge_class(existing, attr.value_str());
            out.set("class", merged);
            return;
        }
    }
    out.push(attr);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, Option<&str>)]) -> Attributes {
        pairs
            .iter()
            .map(|(n, v)| match v {
                Some(v) => Attribute::new(*n, *v),
                None => Attribute::flag(*n),
            })
            .collect()
    }

    fn names(attrs: &Attributes) -> Vec<&str> {
        attrs.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_table_renames() {
        let out = rewrite(attrs(&[
            ("id", Some("a")),
            ("isColumnHeader", Some("true")),
            ("HTMLFOR", Some("b")),
            ("searchMode", Some("contains")),
            ("useAddButton", Some("true")),
            ("useDeleteButton", Some("false")),
            ("isHeader", Some("true")),
        ]));
        assert_eq!(
            names(&out),
            [
                "id",
                "data-column-header",
                "for",
                "data-search-mode",
                "data-use-add-button",
                "data-use-delete-button",
                "data-header"
            ]
        );
        assert_eq!(out.get("for"), Some("b"));
    }

    #[test]
    fn test_selected_gets_value() {
        let out = rewrite(attrs(&[("selected", None)]));
        assert_eq!(out.get("selected"), Some("selected"));
        assert_eq!(out.iter().next().unwrap().value.as_deref(), Some("selected"));
    }

    #[test]
    fn test_class_name_merges() {
        let out = rewrite(attrs(&[("class", Some("a b")), ("className", Some("b c"))]));
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("class"), Some("a b c"));
    }

    #[test]
    fn test_type_promotion() {
        let out = rewrite_with_promotion(attrs(&[
            ("id", Some("x")),
            ("type", Some("primary")),
            ("className", Some("wide")),
        ]));
        assert_eq!(names(&out), ["class", "id"]);
        assert_eq!(out.get("class"), Some("btn primary wide"));
        assert!(!out.has("type"));
    }

    #[test]
    fn test_unknown_attributes_untouched() {
        let input = attrs(&[("data-x", Some("1")), ("disabled", None)]);
        assert_eq!(rewrite(input.clone()), input);
    }
}
