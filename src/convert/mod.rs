//! RodiX document conversion.
//!
//! A document is parsed once and rewritten in place by four passes, in this
//! order (later passes rely on the shape produced by earlier ones):
//!
//! 1. special component kinds ([`special`]): buttons, inputs, toggles,
//!    sliders, select boxes and options
//! 2. generic rename of the remaining `Direct` components ([`rules`])
//! 3. cleanups ([`cleanup`]): void children, row buttons, residual attributes
//! 4. layout stylesheet injection ([`inject`])
//!
//! [`Converter`] owns the conversion statistics reported by the status
//! endpoints; [`transform`] is the stateless core.

pub mod attrs;
mod cleanup;
mod inject;
pub mod rules;
mod special;

pub use inject::LAYOUT_STYLE_ID;

use crate::log;
use crate::markup::{Document, MarkupError, Node};
use crate::utils::date::DateTimeUtc;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot parse document")]
    Markup(#[from] MarkupError),
}

/// Output of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub output: String,
    /// Tag conversions plus cleanup rewrites. Zero for already converted
    /// markup.
    pub substitutions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionFailure {
    pub message: String,
    pub context: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionStats {
    pub total_conversions: u64,
    pub errors: Vec<ConversionFailure>,
}

/// Stateful converter: counts every call and records failures.
#[derive(Debug, Default)]
pub struct Converter {
    stats: ConversionStats,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a document. Every call counts, failed ones included.
    pub fn convert(&mut self, document: &str) -> Result<ConversionResult, ConvertError> {
        self.stats.total_conversions += 1;
        transform(document).inspect_err(|err| self.record_failure(err, document.len()))
    }

    pub fn stats(&self) -> &ConversionStats {
        &self.stats
    }

    pub fn reset(&mut self) {
        self.stats = ConversionStats::default();
    }

    fn record_failure(&mut self, err: &ConvertError, input_len: usize) {
        let message = err.to_string();
        let context = format!("{} ({input_len} bytes of input)", error_chain(err));
        log!("convert"; "{message}: {context}");
        self.stats.errors.push(ConversionFailure {
            message,
            context,
            timestamp: DateTimeUtc::now().to_rfc3339(),
        });
    }
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

/// Stateless conversion of one document.
pub fn transform(document: &str) -> Result<ConversionResult, ConvertError> {
    let mut doc = Document::parse(document)?;

    let mut substitutions = doc.dropped_void_closers;
    doc.children = convert_special(std::mem::take(&mut doc.children), &mut substitutions);
    substitutions += rename_direct(&mut doc);
    substitutions += cleanup::run(&mut doc.children);
    inject::inject_layout(&mut doc);

    Ok(ConversionResult {
        output: doc.to_html(),
        substitutions,
    })
}

/// Children first, so an option list sees already converted options.
fn convert_special(nodes: Vec<Node>, count: &mut usize) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        let Node::Element(mut el) = node else {
            out.push(node);
            continue;
        };
        el.children = convert_special(std::mem::take(&mut el.children), count);
        match rules::lookup(&el.name) {
            Some(rule) if rule.kind.is_special() => {
                *count += 1;
                out.extend(special::convert(el, rule));
            }
            _ => out.push(Node::Element(el)),
        }
    }
    out
}

fn rename_direct(doc: &mut Document) -> usize {
    let mut count = 0;
    doc.walk_mut(&mut |el| {
        let Some(rule) = rules::lookup(&el.name) else {
            return;
        };
        if rule.kind.is_special() {
            return;
        }
        el.name = rule.target.to_string();
        el.attrs = attrs::rewrite_with_promotion(std::mem::take(&mut el.attrs));
        count += 1;
    });
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::html::is_void_element;

    fn body(output: &str) -> &str {
        // Drop the injected layout block to keep assertions readable.
        match output.find("</style>") {
            Some(end) => &output[end + "</style>".len()..],
            None => output,
        }
    }

    #[test]
    fn test_every_tag_maps_both_sides() {
        for rule in rules::COMPONENT_RULES {
            let src = format!("<{0} id=\"a\">t</{0}>", rule.source);
            let out = transform(&src).unwrap().output;
            let lower = out.to_ascii_lowercase();
            let custom = rule.source.to_ascii_lowercase();

            assert!(!lower.contains(&format!("<{custom}")), "{out}");
            assert!(!lower.contains(&format!("</{custom}")), "{out}");
            assert!(out.contains(&format!("<{}", rule.target)), "{out}");
            if !is_void_element(rule.target) {
                assert!(out.contains(&format!("</{}>", rule.target)), "{out}");
            }
        }
    }

    #[test]
    fn test_closing_tag_case_insensitive() {
        let out = transform("<xdiv><XSPAN>a</xspan></XDIV>").unwrap().output;
        assert_eq!(body(&out), "<div><span>a</span></div>");
    }

    #[test]
    fn test_direct_type_promotion() {
        let out = transform(r#"<XDiv type="primary" className="c">x</XDiv>"#)
            .unwrap()
            .output;
        assert_eq!(body(&out), r#"<div class="btn primary c">x</div>"#);
    }

    #[test]
    fn test_select_options() {
        let src = r#"<XSelectBox id="s" className="w">
  <XOption value="1" label="One"/>
  <XOption value="2" label="Two" selected/>
  <XOption value="3"/>
</XSelectBox>"#;
        let out = transform(src).unwrap().output;
        let doc = Document::parse(&out).unwrap();
        let select = doc.find(|el| el.is("select")).unwrap();
        assert_eq!(select.attrs.get("class"), Some("w"));

        let labels: Vec<_> = select
            .child_elements()
            .filter(|el| el.is("option"))
            .map(|el| el.text_content())
            .collect();
        assert_eq!(labels, ["One", "Two", ""]);
    }

    #[test]
    fn test_nested_components() {
        let src = r#"<XTable><XRow><XCell isColumnHeader="true">Kp</XCell><XCell><XInput id="kp" className="input-custom"/></XCell></XRow><XRow><XButton id="apply" text="Apply"/></XRow></XTable>"#;
        let result = transform(src).unwrap();
        let out = body(&result.output);
        assert!(out.starts_with("<table><tr><td data-column-header=\"true\">Kp</td>"));
        assert!(out.contains(r#"<input class="xinput-visible-show input-custom" id="kp" data-visible="true" />"#));
        assert!(out.contains(r#"<tr><td colspan="2" style="text-align: center; padding: 4px;"><button class="btn default xbutton-visible-show" id="apply" data-visible="true">Apply</button></td></tr>"#));
        // table, 2 rows, 2 cells, input, button, row-button wrap
        assert_eq!(result.substitutions, 8);
    }

    #[test]
    fn test_idempotent() {
        let src = r#"<html><head></head><body>
<XTable><XRow><XButton id="add" text="Add" type="primary"/></XRow></XTable>
<XCheckBox id="c">On</XCheckBox>
<XSlider id="s" min="0" max="100" step="5"/>
<XSelectBox id="m"><XOption value="a" label="A"/></XSelectBox>
<XInput id="i"></XInput>
</body></html>"#;
        let first = transform(src).unwrap();
        assert!(first.substitutions > 0);

        let second = transform(&first.output).unwrap();
        assert_eq!(second.substitutions, 0);
        assert_eq!(second.output, first.output);
    }

    #[test]
    fn test_layout_injected_into_head() {
        let out = transform("<html><head><title>t</title></head><body></body></html>")
            .unwrap()
            .output;
        let doc = Document::parse(&out).unwrap();
        let head = doc.find(|el| el.is("head")).unwrap();
        assert!(head
            .child_elements()
            .any(|el| el.attrs.get("id") == Some(LAYOUT_STYLE_ID)));
    }

    #[test]
    fn test_stats_count_calls_and_failures() {
        let mut converter = Converter::new();
        converter.convert("<XDiv>ok</XDiv>").unwrap();
        assert!(converter.convert("<XDiv").is_err());
        converter.convert("plain").unwrap();
        assert!(converter.convert("<!-- open").is_err());

        let stats = converter.stats();
        assert_eq!(stats.total_conversions, 4);
        assert_eq!(stats.errors.len(), 2);
        assert!(stats.errors[0].context.contains("5 bytes"));
        assert!(stats.errors[0].timestamp.ends_with('Z'));

        converter.reset();
        assert_eq!(converter.stats().total_conversions, 0);
        assert!(converter.stats().errors.is_empty());
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let json = serde_json::to_value(ConversionStats::default()).unwrap();
        assert_eq!(json["totalConversions"], 0);
        assert!(json["errors"].as_array().unwrap().is_empty());
    }
}
