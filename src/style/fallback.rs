//! Best-effort SCSS to CSS conversion used when the compiler fails.
//!
//! Strips what plain CSS cannot express (line comments, imports, mixins,
//! includes, extends) and substitutes variables. Nested rules are left
//! as written.

use regex::{Captures, Regex};
use rustc_hash::FxHashMap;
use std::sync::LazyLock;

/// Values of the shared design variables.
pub const DEFAULT_VARIABLES: &[(&str, &str)] = &[
    ("$primary-color", "#59d5ef"),
    ("$dark-primary-color", "#428bca"),
    ("$danger-color", "#fe6464"),
    ("$point-color", "#00c0c7"),
    ("$gray-color", "#cacaca"),
    ("$lite-gray-color", "#ddd"),
    ("$disable-color", "#727272"),
    ("$disable-bg-color", "#b3b8bd"),
    ("$dark-navy-color", "#20272D"),
    ("$border-radius-default", "5px"),
    ("$white", "#ffffff"),
    ("$black", "#000000"),
];

macro_rules! regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect(concat!("valid pattern ", stringify!($name))));
    };
}

regex!(LINE_COMMENT, r"(?m)(^|[^:])//[^\n]*");
regex!(IMPORT, r#"@import\s+[^;\n]*;?"#);
regex!(INCLUDE_OR_EXTEND, r"@(?:include|extend)\s+[^;]+;");
regex!(
    DECLARATION,
    r"(?m)^[ \t]*(\$[A-Za-z_][\w-]*)[ \t]*:[ \t]*([^;]+?)[ \t]*(?:!default)?[ \t]*;[ \t]*\n?"
);
regex!(VARIABLE, r"\$[A-Za-z_][\w-]*");

/// Convert SCSS text. `variables` are applied after local declarations.
pub fn convert(source: &str, variables: &FxHashMap<String, String>) -> String {
    let css = LINE_COMMENT.replace_all(source, "${1}");
    let css = IMPORT.replace_all(&css, "");
    let css = strip_mixins(&css);
    let css = INCLUDE_OR_EXTEND.replace_all(&css, "");

    let mut scope = variables.clone();
    for cap in DECLARATION.captures_iter(&css) {
        let value = substitute(&cap[2], &scope);
        scope.insert(cap[1].to_string(), value);
    }
    let css = DECLARATION.replace_all(&css, "");

    substitute(&css, &scope).trim().to_string()
}

/// Replace known `$name` references; unknown ones stay.
fn substitute(text: &str, scope: &FxHashMap<String, String>) -> String {
    VARIABLE
        .replace_all(text, |cap: &Captures| {
            scope
                .get(&cap[0])
                .cloned()
                .unwrap_or_else(|| cap[0].to_string())
        })
        .into_owned()
}

/// Remove `@mixin name(...) { ... }` blocks, matching nested braces.
fn strip_mixins(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;

    while let Some(start) = rest.find("@mixin") {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        let Some(open) = after.find('{') else {
            rest = "";
            break;
        };

        let mut depth = 0usize;
        let mut end = after.len();
        for (i, c) in after[open..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = open + i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }
        rest = &after[end..];
    }

    out.push_str(rest);
    out
}

/// Default table merged with user overrides.
pub fn variable_table<'a>(
    overrides: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> FxHashMap<String, String> {
    let mut table: FxHashMap<String, String> = DEFAULT_VARIABLES
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    for (name, value) in overrides {
        let name = if name.starts_with('$') {
            name.clone()
        } else {
            format!("${name}")
        };
        table.insert(name, value.clone());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn defaults() -> FxHashMap<String, String> {
        variable_table(&BTreeMap::<String, String>::new())
    }

    #[test]
    fn test_strips_scss_only_constructs() {
        let src = r#"@import "variables";
// heading
@mixin flex-center($dir) {
  display: flex;
  &:hover { opacity: 1; }
}
.a {
  @include flex-center(row);
  @extend .b;
  background: url(http://example.com/x.png); // trailing
}"#;
        let css = convert(src, &defaults());
        assert!(!css.contains("@import"));
        assert!(!css.contains("@mixin"));
        assert!(!css.contains("@include"));
        assert!(!css.contains("@extend"));
        assert!(!css.contains("heading"));
        assert!(!css.contains("trailing"));
        assert!(css.contains("url(http://example.com/x.png)"));
        assert!(css.starts_with(".a {"));
    }

    #[test]
    fn test_fixed_variables() {
        let css = convert(".a { color: $primary-color; border-radius: $border-radius-default; }", &defaults());
        assert_eq!(css, ".a { color: #59d5ef; border-radius: 5px; }");
    }

    #[test]
    fn test_variable_name_boundary() {
        let css = convert(".a { color: $white-smoke; b: $white; }", &defaults());
        assert_eq!(css, ".a { color: $white-smoke; b: #ffffff; }");
    }

    #[test]
    fn test_local_declarations_win() {
        let src = "$gap: 4px;\n$primary-color: red;\n$pad: $gap;\n.a { padding: $pad; color: $primary-color; }";
        let css = convert(src, &defaults());
        assert_eq!(css, ".a { padding: 4px; color: red; }");
    }

    #[test]
    fn test_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert("white".to_string(), "#fefefe".to_string());
        let table = variable_table(&overrides);
        assert_eq!(table["$white"], "#fefefe");
        assert_eq!(table["$black"], "#000000");
    }
}
