//! Per-component fixups applied to compiled wrapper stylesheets.
//!
//! Every wrapper stylesheet defines the same `.visible-show` /
//! `.visible-hide` pair; namespacing them per component keeps one
//! component's visibility rules from hiding another's elements.

use regex::Regex;
use std::sync::LazyLock;

static VISIBILITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.visible-(show|hide)\b").expect("valid visibility pattern")
});
static BUTTON_SELECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\w.-])(\.xbutton-visible-(?:show|hide))\b").expect("valid button pattern")
});
static TEXT_ALIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]*text-align\s*:[^;}]*;?[ \t]*\n?").expect("valid text-align pattern")
});
static FLEX_DISPLAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"display\s*:\s*flex\b(?:\s*!important)?").expect("valid display pattern")
});

const BUTTON_OVERRIDE: &str = "
/* shared .btn display must not win over the hide state */
button.btn.xbutton-visible-hide {
  display: none !important;
}";

/// Apply the fixups for wrapper component `name`.
pub fn apply(name: &str, css: &str) -> String {
    let prefix = name.to_ascii_lowercase();
    let mut css = VISIBILITY
        .replace_all(css, format!(".{prefix}-visible-$1"))
        .into_owned();

    match name {
        "XButton" => {
            css = BUTTON_SELECTOR.replace_all(&css, "${1}button$2").into_owned();
            css.push_str(BUTTON_OVERRIDE);
        }
        "XLabel" => css = TEXT_ALIGN.replace_all(&css, "").into_owned(),
        "XCheckBox" => {
            css = FLEX_DISPLAY
                .replace_all(&css, "display: flex !important")
                .into_owned();
        }
        _ => {}
    }
    css
}
