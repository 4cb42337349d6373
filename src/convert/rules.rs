//! Static component table.
//!
//! Every custom tag maps to exactly one standard tag and a structural kind.
//! `Direct` rules are plain renames; the other kinds have their own
//! conversion in [`super::special`].

/// Native input type of a label-wrapped toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleKind {
    Checkbox,
    Radio,
}

impl ToggleKind {
    pub const ALL: [Self; 2] = [Self::Checkbox, Self::Radio];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
        }
    }

    /// Class of the wrapping `label`.
    pub const fn label_class(self) -> &'static str {
        match self {
            Self::Checkbox => "xcheckbox",
            Self::Radio => "xradio",
        }
    }

    /// Class of the icon span; the runtime adds `checked` beside it.
    pub const fn icon_class(self) -> &'static str {
        match self {
            Self::Checkbox => "xcheckbox-icon",
            Self::Radio => "xradio-icon",
        }
    }

    pub const fn text_class(self) -> &'static str {
        match self {
            Self::Checkbox => "xcheckbox-text",
            Self::Radio => "xradio-text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Tag rename plus attribute rewrite.
    Direct,
    /// `text` attribute becomes content; synthesized class list.
    Clickable,
    /// Native input with the visibility class pair.
    TextInput,
    /// Hidden input inside a label with icon and text placeholders.
    WrappedInput(ToggleKind),
    /// Native range input.
    Range,
    /// Select container.
    OptionList,
    /// `label` attribute becomes the option text.
    Option,
}

impl ComponentKind {
    /// Kinds handled by the structural pass rather than the rename pass.
    pub const fn is_special(self) -> bool {
        !matches!(self, Self::Direct)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentRule {
    pub source: &'static str,
    pub target: &'static str,
    pub kind: ComponentKind,
}

impl ComponentRule {
    const fn new(source: &'static str, target: &'static str, kind: ComponentKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }

    /// Prefix of the visibility class pair, e.g. `xbutton`.
    pub fn class_prefix(&self) -> String {
        self.source.to_ascii_lowercase()
    }
}

pub const COMPONENT_RULES: &[ComponentRule] = &[
    ComponentRule::new("XButton", "button", ComponentKind::Clickable),
    ComponentRule::new("XInput", "input", ComponentKind::TextInput),
    ComponentRule::new(
        "XCheckBox",
        "input",
        ComponentKind::WrappedInput(ToggleKind::Checkbox),
    ),
    ComponentRule::new(
        "XRadio",
        "input",
        ComponentKind::WrappedInput(ToggleKind::Radio),
    ),
    ComponentRule::new("XSlider", "input", ComponentKind::Range),
    ComponentRule::new("XSelectBox", "select", ComponentKind::OptionList),
    ComponentRule::new("XOption", "option", ComponentKind::Option),
    ComponentRule::new("XTable", "table", ComponentKind::Direct),
    ComponentRule::new("XRow", "tr", ComponentKind::Direct),
    ComponentRule::new("XCell", "td", ComponentKind::Direct),
    ComponentRule::new("XLabel", "label", ComponentKind::Direct),
    ComponentRule::new("XSpan", "span", ComponentKind::Direct),
    ComponentRule::new("XDiv", "div", ComponentKind::Direct),
    ComponentRule::new("XImage", "img", ComponentKind::Direct),
    ComponentRule::new("XTableList", "div", ComponentKind::Direct),
    ComponentRule::new("XPaginate", "div", ComponentKind::Direct),
];

/// Rule for a tag name, compared case-insensitively.
pub fn lookup(tag: &str) -> Option<&'static ComponentRule> {
    COMPONENT_RULES
        .iter()
        .find(|rule| rule.source.eq_ignore_ascii_case(tag))
}
