//! Custom dropdowns built over single-choice selects.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dropdown {
    pub id: Option<String>,
    pub options: Vec<DropdownOption>,
    pub selected: Option<usize>,
}

impl Dropdown {
    pub fn new(id: Option<String>, options: Vec<DropdownOption>, selected: Option<usize>) -> Self {
        // native selects show the first option when none is marked
        let selected = selected.or(if options.is_empty() { None } else { Some(0) });
        Self {
            id,
            options,
            selected,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DropdownSet {
    items: Vec<Dropdown>,
}

impl DropdownSet {
    pub fn new(items: Vec<Dropdown>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Dropdown] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_option_selected_by_default() {
        let options = vec![
            DropdownOption {
                value: "a".into(),
                label: "Auto".into(),
            },
            DropdownOption {
                value: "m".into(),
                label: "Manual".into(),
            },
        ];
        assert_eq!(Dropdown::new(None, options.clone(), None).selected, Some(0));
        assert_eq!(Dropdown::new(None, options, Some(1)).selected, Some(1));
    }

    #[test]
    fn test_empty_dropdown() {
        let d = Dropdown::new(None, Vec::new(), None);
        assert_eq!(d.selected, None);
    }
}
