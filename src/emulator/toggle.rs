//! Checkbox and radio state as the page loads.

use crate::convert::rules::ToggleKind;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toggle {
    pub id: Option<String>,
    pub kind: &'static str,
    /// Radio group name.
    pub name: Option<String>,
    pub checked: bool,
    /// Icon span class the runtime keeps in sync with `checked`.
    pub icon: &'static str,
}

impl Toggle {
    pub fn new(kind: ToggleKind, id: Option<String>, name: Option<String>) -> Self {
        Self {
            id,
            kind: kind.as_str(),
            name,
            checked: false,
            icon: kind.icon_class(),
        }
    }

    fn is_radio(&self) -> bool {
        self.kind == ToggleKind::Radio.as_str()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ToggleSet {
    items: Vec<Toggle>,
}

impl ToggleSet {
    /// Radios checked in markup follow the browser: the last one per group
    /// wins.
    pub fn new(items: Vec<Toggle>) -> Self {
        let mut set = Self { items };
        let checked: Vec<usize> = (0..set.items.len())
            .filter(|&i| set.items[i].checked && set.items[i].is_radio())
            .collect();
        for i in checked {
            set.check_radio(i);
        }
        set
    }

    pub fn items(&self) -> &[Toggle] {
        &self.items
    }

    /// Clear every other radio sharing the group name.
    fn check_radio(&mut self, index: usize) {
        let name = self.items[index].name.clone();
        if name.is_none() {
            return;
        }
        for (i, t) in self.items.iter_mut().enumerate() {
            if i != index && t.is_radio() && t.name == name {
                t.checked = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radio(id: &str, name: Option<&str>, checked: bool) -> Toggle {
        Toggle {
            checked,
            ..Toggle::new(ToggleKind::Radio, Some(id.into()), name.map(Into::into))
        }
    }

    fn checked(set: &ToggleSet) -> Vec<bool> {
        set.items().iter().map(|t| t.checked).collect()
    }

    #[test]
    fn test_last_checked_radio_wins() {
        let set = ToggleSet::new(vec![
            radio("a", Some("g"), true),
            radio("b", Some("g"), true),
            radio("c", Some("other"), true),
        ]);
        assert_eq!(checked(&set), [false, true, true]);
    }

    #[test]
    fn test_unnamed_radios_are_independent() {
        let set = ToggleSet::new(vec![radio("a", None, true), radio("b", None, true)]);
        assert_eq!(checked(&set), [true, true]);
    }

    #[test]
    fn test_checkboxes_untouched_and_icon_class() {
        let set = ToggleSet::new(vec![
            Toggle {
                checked: true,
                ..Toggle::new(ToggleKind::Checkbox, Some("c".into()), Some("g".into()))
            },
            radio("r", Some("g"), true),
        ]);
        assert_eq!(checked(&set), [true, true]);
        assert_eq!(set.items()[0].icon, "xcheckbox-icon");
        assert_eq!(set.items()[1].icon, "xradio-icon");
    }
}
