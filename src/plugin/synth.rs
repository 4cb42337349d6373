//! Browser script generation for an extracted plugin.

use super::rewrite::rewrite_body;
use super::{HandlerKind, PluginSource};
use std::fmt::Write;

const BIND_ALL: &str = "__rodixBindAll";
const BIND_ONE: &str = "__rodixBind";

const DEFAULT_PARAMS: &str = "type, data";

/// Emit the `PluginEmulator` class for `source`.
///
/// The instance is only created when the runtime emulator (`window.rodiX`)
/// is present on the page.
pub fn synthesize(source: &PluginSource) -> String {
    let mut js = String::with_capacity(source.raw.len() * 2);
    let handlers = &source.extraction.handlers;

    let _ = writeln!(js, "// Plugin emulation: {}", source.file_name());
    js.push_str(
        "class PluginEmulator {
  constructor() {
    this.components = {};
    this.rodiX = window.rodiX;
    this.data = {};
    document.querySelectorAll('[id]').forEach((el) => {
      this.components[el.id] = el;
    });
",
    );
    let _ = writeln!(js, "    this.{BIND_ALL}();\n  }}\n");

    let _ = writeln!(js, "  {BIND_ALL}() {{");
    for init in handlers
        .iter()
        .filter(|h| h.kind == HandlerKind::Init && h.name.starts_with("_init"))
    {
        let _ = writeln!(js, "    this.{}();", init.name);
    }
    for (binding, index) in source.bindings.resolved() {
        let _ = writeln!(
            js,
            "    this.{BIND_ONE}({}, this.{}.bind(this));",
            quote(&binding.component_id),
            handlers[index].name,
        );
    }
    js.push_str("  }\n\n");

    let _ = write!(
        js,
        "  {BIND_ONE}(id, handler) {{
    const emit = (type, payload = {{}}) => handler(type, payload);
    if (window.rodiX && typeof window.rodiX.registerHandler === 'function') {{
      window.rodiX.registerHandler(id, emit);
    }}
    const el = this.components[id];
    if (!el) return;
    el.addEventListener('click', (e) => emit('click', {{ value: e.target.value }}));
    el.addEventListener('change', (e) => emit('change', {{ value: e.target.value }}));
    el.addEventListener('rodix-select', (e) => emit('select', e.detail || {{}}));
  }}
"
    );

    for handler in handlers {
        let params = if handler.params.is_empty() && handler.kind == HandlerKind::Event {
            DEFAULT_PARAMS
        } else {
            handler.params.as_str()
        };
        let body = if handler.body.is_empty() {
            "{}".to_string()
        } else {
            rewrite_body(&handler.body)
        };
        let _ = write!(
            js,
            "\n  {}{}({params}) {body}\n",
            handler.modifiers(),
            handler.name
        );
    }

    js.push_str(
        "}

if (window.rodiX) {
  window.pluginEmulator = new PluginEmulator();
}
",
    );
    js
}

/// JavaScript string literal for `s`.
fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
}
