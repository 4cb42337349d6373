//! What the browser runtime will bind on a converted document.
//!
//! [`scan`] walks the converted tree in document order. The plan is
//! injected into the runtime, which binds the page from it, and served by
//! `/api/emulator` for inspection.

use super::button::{self, ButtonAction, ButtonFacts, TAB_GROUP_ATTR, TAB_GROUP_CLASS};
use super::dropdown::{Dropdown, DropdownOption, DropdownSet};
use super::slider::SliderRange;
use super::toggle::{Toggle, ToggleSet};
use crate::convert::rules::ToggleKind;
use crate::markup::{Document, Element, Node};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonBinding {
    pub id: Option<String>,
    pub label: String,
    pub action: ButtonAction,
    /// Ids the action reads or mutates.
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderBinding {
    pub id: Option<String>,
    #[serde(flatten)]
    pub range: SliderRange,
    /// Last grid point; the End key and out-of-range input land here.
    pub top: f64,
    /// Initial value after quantization.
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmulatorPlan {
    pub buttons: Vec<ButtonBinding>,
    /// Buttons no rule claims.
    pub inert_buttons: usize,
    pub toggles: ToggleSet,
    pub dropdowns: DropdownSet,
    pub sliders: Vec<SliderBinding>,
    /// Disabled toggles, selects and sliders left unbound.
    pub skipped_disabled: usize,
}

impl EmulatorPlan {
    pub fn binding_count(&self) -> usize {
        self.buttons.len()
            + self.toggles.items().len()
            + self.dropdowns.items().len()
            + self.sliders.len()
    }
}

pub fn scan(doc: &Document) -> EmulatorPlan {
    let mut scan = Scan::default();
    scan.nodes(&doc.children, None);

    EmulatorPlan {
        buttons: scan.buttons,
        inert_buttons: scan.inert_buttons,
        toggles: ToggleSet::new(scan.toggles),
        dropdowns: DropdownSet::new(scan.dropdowns),
        sliders: scan.sliders,
        skipped_disabled: scan.skipped_disabled,
    }
}

#[derive(Default)]
struct Scan {
    buttons: Vec<ButtonBinding>,
    inert_buttons: usize,
    toggles: Vec<Toggle>,
    dropdowns: Vec<Dropdown>,
    sliders: Vec<SliderBinding>,
    skipped_disabled: usize,
}

impl Scan {
    fn nodes(&mut self, nodes: &[Node], parent: Option<&Element>) {
        for node in nodes {
            if let Node::Element(el) = node {
                self.element(el, parent);
                self.nodes(&el.children, Some(el));
            }
        }
    }

    fn element(&mut self, el: &Element, parent: Option<&Element>) {
        let disabled = el.attrs.has("disabled");
        let id = el.attrs.get("id").map(str::to_string);

        if el.is("button") {
            self.button(el, parent);
        } else if el.is("select") {
            if el.attrs.has("multiple") {
                return;
            }
            if disabled {
                self.skipped_disabled += 1;
            } else {
                self.dropdowns.push(dropdown(el, id));
            }
        } else if el.is("input") {
            match el.attrs.get("type").map(str::to_ascii_lowercase).as_deref() {
                Some("range") if disabled => self.skipped_disabled += 1,
                Some("range") => {
                    let range = SliderRange::from_attrs(
                        el.attrs.get("min"),
                        el.attrs.get("max"),
                        el.attrs.get("step"),
                    );
                    let initial = el.attrs.get("value").and_then(|v| v.trim().parse().ok());
                    self.sliders.push(SliderBinding {
                        id,
                        range,
                        top: range.top(),
                        value: range.initial(initial),
                    });
                }
                Some(kind @ ("checkbox" | "radio")) if in_toggle_label(parent) => {
                    if disabled {
                        self.skipped_disabled += 1;
                        return;
                    }
                    let kind = if kind == "radio" {
                        ToggleKind::Radio
                    } else {
                        ToggleKind::Checkbox
                    };
                    let name = el.attrs.get("name").map(str::to_string);
                    self.toggles.push(Toggle {
                        checked: el.attrs.has("checked"),
                        ..Toggle::new(kind, id, name)
                    });
                }
                _ => {}
            }
        }
    }

    fn button(&mut self, el: &Element, parent: Option<&Element>) {
        let id = el.attrs.get("id");
        let label = el.text_content();
        let label = label.trim();
        let facts = ButtonFacts {
            id: id.unwrap_or_default(),
            label,
            in_tab_group: parent.is_some_and(is_tab_group),
        };
        match button::classify(&facts) {
            Some(classified) => self.buttons.push(ButtonBinding {
                id: id.map(str::to_string),
                label: label.to_string(),
                action: classified.action,
                targets: button::targets(&facts, classified),
            }),
            None => self.inert_buttons += 1,
        }
    }
}

fn is_tab_group(el: &Element) -> bool {
    el.attrs.has(TAB_GROUP_ATTR)
        || el
            .attrs
            .get("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == TAB_GROUP_CLASS))
}

/// Converted toggles are direct children of their kind's label.
fn in_toggle_label(parent: Option<&Element>) -> bool {
    parent.is_some_and(|p| {
        p.is("label")
            && p.attrs.get("class").is_some_and(|c| {
                c.split_whitespace()
                    .any(|c| ToggleKind::ALL.iter().any(|k| k.label_class() == c))
            })
    })
}

fn dropdown(select: &Element, id: Option<String>) -> Dropdown {
    let mut selected = None;
    let options = select
        .child_elements()
        .filter(|el| el.is("option"))
        .enumerate()
        .map(|(i, el)| {
            if el.attrs.has("selected") {
                selected = Some(i);
            }
            let label = el.text_content().trim().to_string();
            let value = el.attrs.get("value").map_or_else(|| label.clone(), str::to_string);
            DropdownOption { value, label }
        })
        .collect();
    Dropdown::new(id, options, selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::transform;

    fn plan(src: &str) -> EmulatorPlan {
        let converted = transform(src).unwrap().output;
        scan(&Document::parse(&converted).unwrap())
    }

    #[test]
    fn test_buttons() {
        let p = plan(
            r#"<div class="tab-group"><XButton id="tabMain" text="Main"/></div>
<XButton id="btnAddGain" text="Add"/>
<XButton id="btnApply" text="Apply"/>
<XButton id="b9" text="Reset table"/>"#,
        );
        let actions: Vec<_> = p.buttons.iter().map(|b| b.action).collect();
        assert_eq!(
            actions,
            [ButtonAction::TabSwitch, ButtonAction::Add, ButtonAction::Revert]
        );
        assert_eq!(p.buttons[0].targets, ["panelMain"]);
        assert_eq!(p.buttons[1].targets, ["btnSelectGain", "btnTableGain"]);
        assert_eq!(p.inert_buttons, 1);
    }

    #[test]
    fn test_sliders_quantized_and_disabled_skipped() {
        let p = plan(
            r#"<XSlider id="gain" min="0" max="100" step="5" value="42"/>
<XSlider id="off" disabled/>"#,
        );
        assert_eq!(p.sliders.len(), 1);
        assert_eq!(p.sliders[0].value, 40.0);
        assert_eq!(p.skipped_disabled, 1);
    }

    #[test]
    fn test_slider_off_grid_max() {
        let p = plan(r#"<XSlider id="s" min="0" max="12" step="5" value="13"/>"#);
        assert_eq!(p.sliders[0].top, 10.0);
        assert_eq!(p.sliders[0].value, 10.0);

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["sliders"][0]["max"], 12.0);
        assert_eq!(json["sliders"][0]["top"], 10.0);
    }

    #[test]
    fn test_multiple_select_left_native() {
        let p = plan(r#"<select id="many" multiple><option>a</option></select>"#);
        assert!(p.dropdowns.items().is_empty());
        assert_eq!(p.skipped_disabled, 0);
    }

    #[test]
    fn test_toggles() {
        let p = plan(
            r#"<XRadio id="r1" name="m" checked>A</XRadio>
<XRadio id="r2" name="m" checked>B</XRadio>
<XCheckBox id="c1" disabled>C</XCheckBox>
<input type="checkbox" id="plain">"#,
        );
        let states: Vec<_> = p
            .toggles
            .items()
            .iter()
            .map(|t| (t.id.as_deref().unwrap(), t.checked))
            .collect();
        assert_eq!(states, [("r1", false), ("r2", true)]);
        assert_eq!(p.skipped_disabled, 1);
    }

    #[test]
    fn test_dropdowns() {
        let p = plan(
            r#"<XSelectBox id="mode"><XOption value="a" label="Auto"/><XOption value="m" label="Manual" selected/></XSelectBox>
<XSelectBox id="unit"><XOption value="mm" label="mm"/></XSelectBox>"#,
        );
        let items = p.dropdowns.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].selected, Some(1));
        assert_eq!(items[1].selected, Some(0));
        assert_eq!(p.binding_count(), 2);

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["dropdowns"][0]["id"], "mode");
        assert_eq!(json["dropdowns"][0]["selected"], 1);
        assert_eq!(json["skippedDisabled"], 0);
    }
}
