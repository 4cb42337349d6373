//! Template types for typed variable injection.

use std::marker::PhantomData;

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }

    pub const fn content(&self) -> &'static str {
        self.content
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

/// Replace every placeholder in one left-to-right pass.
///
/// Substituted values are never rescanned, so a value that happens to contain
/// another placeholder is copied through untouched.
pub fn substitute(content: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    loop {
        let next = pairs
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|at| (at, *key, *value)))
            .min_by_key(|(at, ..)| *at);
        let Some((at, key, value)) = next else { break };
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + key.len()..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_single_pass() {
        let out = substitute(
            "<title>__TITLE__</title><main>__BODY__</main>",
            &[("__TITLE__", "t"), ("__BODY__", "literal __TITLE__")],
        );
        assert_eq!(out, "<title>t</title><main>literal __TITLE__</main>");
    }

    #[test]
    fn test_substitute_repeated_and_missing() {
        assert_eq!(substitute("_A_ and _A_", &[("_A_", "x")]), "x and x");
        assert_eq!(substitute("plain", &[("_A_", "x")]), "plain");
    }
}
