//! Button click classification.
//!
//! A button's action is decided by the first rule in [`BUTTON_RULES`] that
//! matches; later rules never see a button an earlier rule claimed. The same
//! list is serialized into the browser runtime so both sides agree.

use serde::Serialize;

/// Rows a table keeps after a revert (header plus one data row).
pub const REVERT_MIN_ROWS: usize = 2;

/// Class or attribute marking a container whose buttons are tabs.
pub const TAB_GROUP_CLASS: &str = "tab-group";
pub const TAB_GROUP_ATTR: &str = "data-tab-group";

pub const TAB_PREFIX: &str = "tab";
pub const PANEL_PREFIX: &str = "panel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonAction {
    TabSwitch,
    ShowMessage,
    Add,
    Delete,
    Revert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "values")]
pub enum Predicate {
    /// Parent element carries the tab-group marker.
    TabGroupParent,
    /// Id or label contains one of the keywords, ignoring case.
    Keywords(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ButtonRule {
    pub action: ButtonAction,
    #[serde(rename = "when")]
    pub predicate: Predicate,
}

pub const BUTTON_RULES: &[ButtonRule] = &[
    ButtonRule {
        action: ButtonAction::TabSwitch,
        predicate: Predicate::TabGroupParent,
    },
    ButtonRule {
        action: ButtonAction::ShowMessage,
        predicate: Predicate::Keywords(&["message", "msg"]),
    },
    ButtonRule {
        action: ButtonAction::Add,
        predicate: Predicate::Keywords(&["add"]),
    },
    ButtonRule {
        action: ButtonAction::Delete,
        predicate: Predicate::Keywords(&["delete", "remove"]),
    },
    ButtonRule {
        action: ButtonAction::Revert,
        predicate: Predicate::Keywords(&["revert", "reset"]),
    },
];

/// What the classifier knows about one button.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonFacts<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub in_tab_group: bool,
}

impl Predicate {
    /// The keyword that matched, or `""` for structural predicates.
    fn matches(&self, facts: &ButtonFacts) -> Option<&'static str> {
        match self {
            Self::TabGroupParent => facts.in_tab_group.then_some(""),
            Self::Keywords(words) => {
                let id = facts.id.to_ascii_lowercase();
                let label = facts.label.to_lowercase();
                words
                    .iter()
                    .find(|w| id.contains(*w) || label.contains(*w))
                    .copied()
            }
        }
    }
}

/// Classification result with the keyword that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    pub action: ButtonAction,
    pub keyword: &'static str,
}

pub fn classify(facts: &ButtonFacts) -> Option<Classified> {
    BUTTON_RULES.iter().find_map(|rule| {
        rule.predicate.matches(facts).map(|keyword| Classified {
            action: rule.action,
            keyword,
        })
    })
}

/// `tabGeneral` -> `panelGeneral`. Ids without the prefix get it prepended.
pub fn panel_id(button_id: &str) -> String {
    match strip_prefix_ignore_case(button_id, TAB_PREFIX) {
        Some(rest) => format!("{PANEL_PREFIX}{rest}"),
        None => format!("{PANEL_PREFIX}{button_id}"),
    }
}

/// Replace the first case-insensitive occurrence of `keyword` in `id`:
/// `btnAddRow` with `add` and `Table` -> `btnTableRow`.
pub fn companion_id(id: &str, keyword: &str, replacement: &str) -> Option<String> {
    if keyword.is_empty() {
        return None;
    }
    let start = id.to_ascii_lowercase().find(keyword)?;
    let end = start + keyword.len();
    Some(format!("{}{replacement}{}", &id[..start], &id[end..]))
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Ids of the elements an action reads or mutates.
pub fn targets(facts: &ButtonFacts, classified: Classified) -> Vec<String> {
    let derive = |replacement| companion_id(facts.id, classified.keyword, replacement);
    match classified.action {
        ButtonAction::TabSwitch => vec![panel_id(facts.id)],
        ButtonAction::ShowMessage => [derive("Input"), derive("Select")].into_iter().flatten().collect(),
        ButtonAction::Add | ButtonAction::Delete => {
            [derive("Select"), derive("Table")].into_iter().flatten().collect()
        }
        ButtonAction::Revert => derive("Table").into_iter().collect(),
    }
}
