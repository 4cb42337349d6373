//! Handler body rewrites from host API calls to browser equivalents.

use regex::Regex;
use std::sync::LazyLock;

struct Rewrite {
    pattern: LazyLock<Regex>,
    replacement: &'static str,
}

macro_rules! rewrite {
    ($pattern:expr => $replacement:expr) => {
        Rewrite {
            pattern: LazyLock::new(|| Regex::new($pattern).expect("valid rewrite pattern")),
            replacement: $replacement,
        }
    };
}

/// Applied in order; later patterns expect the `this.components.X` form.
static REWRITES: [Rewrite; 5] = [
    rewrite!(r#"this\.components\[\s*['"](\w+)['"]\s*\]"# => "this.components.$1"),
    rewrite!(
        r#"this\.components\.(\w+)\.setClassName\(\s*['"]([^'"]*)['"]\s*\)"#
            => r#"this.components.$1.className = "$2""#
    ),
    rewrite!(
        r"this\.components\.(\w+)\.setVisible\(\s*([^()]+?)\s*\)"
            => "this.components.$1.style.display = $2 ? 'block' : 'none'"
    ),
    rewrite!(r"this\.uiHandler\.render\(\s*\)\s*;?" => ""),
    rewrite!(
        r"this\.rodiAPI\.getUserInteraction\(\)\.MessageBox\.show\([^,()]+,\s*([^,()]+?)\s*,\s*([^,()]+?)\s*(?:,[^()]*)?\)"
            => r#"alert($2 + "\n\n" + $1)"#
    ),
];

/// Rewrite a handler body. Text that matches no rule is kept verbatim.
pub fn rewrite_body(body: &str) -> String {
    REWRITES.iter().fold(body.to_string(), |text, rule| {
        rule.pattern.replace_all(&text, rule.replacement).into_owned()
    })
}
