//! Syntax-tree extraction with oxc.

use super::{
    EventKind, Extraction, HandlerDescriptor, HandlerKind, PluginBinding, Strategy, push_method,
};
use oxc::allocator::Allocator;
use oxc::ast::ast::{
    Argument, CallExpression, Class, ClassElement, Declaration, ExportDefaultDeclarationKind,
    Expression, MethodDefinitionKind, Program, Statement,
};
use oxc::ast_visit::{Visit, walk};
use oxc::parser::Parser;
use oxc::span::{GetSpan, SourceType};

/// Parse `source` and collect the methods of the behavior class and the
/// `uiHandler.on` bindings it makes. `None` when the source has syntax
/// errors.
///
/// The behavior class is the default export, else the first exported
/// class, else the first class in the file. Other classes, nested ones
/// included, are ignored.
pub(super) fn extract(source: &str) -> Option<Extraction> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if !ret.errors.is_empty() {
        return None;
    }

    let mut collector = Collector {
        source,
        bindings: Vec::new(),
        handlers: Vec::new(),
        class_seen: false,
    };
    match behavior_class(&ret.program) {
        Some(class) => collector.visit_class(class),
        None => collector.visit_program(&ret.program),
    }

    Some(Extraction {
        bindings: collector.bindings,
        handlers: collector.handlers,
        strategy: Strategy::Ast,
    })
}

fn behavior_class<'p, 'a>(program: &'p Program<'a>) -> Option<&'p Class<'a>> {
    let mut exported = None;
    let mut first = None;
    for statement in &program.body {
        match statement {
            Statement::ExportDefaultDeclaration(export) => {
                if let ExportDefaultDeclarationKind::ClassDeclaration(class) = &export.declaration {
                    return Some(&**class);
                }
            }
            Statement::ExportNamedDeclaration(export) => {
                if let Some(Declaration::ClassDeclaration(class)) = &export.declaration {
                    exported.get_or_insert(&**class);
                }
            }
            Statement::ClassDeclaration(class) => {
                first.get_or_insert(&**class);
            }
            _ => {}
        }
    }
    exported.or(first)
}

struct Collector<'s> {
    source: &'s str,
    bindings: Vec<PluginBinding>,
    handlers: Vec<HandlerDescriptor>,
    /// Only the first class visited contributes.
    class_seen: bool,
}

fn slice(source: &str, start: u32, end: u32) -> &str {
    source.get(start as usize..end as usize).unwrap_or_default()
}

impl<'a> Visit<'a> for Collector<'_> {
    fn visit_class(&mut self, class: &Class<'a>) {
        if self.class_seen {
            return;
        }
        self.class_seen = true;

        let source = self.source;
        for element in &class.body.body {
            let ClassElement::MethodDefinition(method) = element else {
                continue;
            };
            if method.kind != MethodDefinitionKind::Method || method.r#static {
                continue;
            }
            let (Some(name), Some(body)) = (method.key.static_name(), &method.value.body) else {
                continue;
            };

            let params = slice(source, method.value.params.span.start, method.value.params.span.end);
            let params = params.trim();
            let params = params
                .strip_prefix('(')
                .and_then(|p| p.strip_suffix(')'))
                .unwrap_or(params)
                .trim()
                .to_string();

            push_method(
                &mut self.handlers,
                HandlerDescriptor {
                    kind: HandlerKind::classify(&name),
                    name: name.to_string(),
                    params,
                    body: slice(source, body.span.start, body.span.end).to_string(),
                    offset: method.key.span().start as usize,
                    is_async: method.value.r#async,
                    is_generator: method.value.generator,
                },
            );
        }
        walk::walk_class(self, class);
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Some(binding) = ui_handler_binding(call) {
            self.bindings.push(binding);
        }
        walk::walk_call_expression(self, call);
    }
}

/// `this.uiHandler.on('<id>', this.<method>.bind(this))` or
/// `this.uiHandler.on('<id>', this.<method>)`.
fn ui_handler_binding(call: &CallExpression) -> Option<PluginBinding> {
    let Expression::StaticMemberExpression(callee) = &call.callee else {
        return None;
    };
    if callee.property.name.as_str() != "on" || !is_this_member(&callee.object, "uiHandler") {
        return None;
    }

    let [id, handler, ..] = call.arguments.as_slice() else {
        return None;
    };
    let Argument::StringLiteral(id) = id else {
        return None;
    };

    Some(PluginBinding {
        component_id: id.value.to_string(),
        handler_name: handler_method(handler.as_expression()?)?.to_string(),
        event_kind: EventKind::UiHandlerOn,
    })
}

fn handler_method<'a>(expr: &'a Expression) -> Option<&'a str> {
    match expr {
        Expression::StaticMemberExpression(member) if is_this(&member.object) => {
            Some(member.property.name.as_str())
        }
        Expression::CallExpression(bind) => {
            let Expression::StaticMemberExpression(callee) = &bind.callee else {
                return None;
            };
            if callee.property.name.as_str() != "bind" {
                return None;
            }
            handler_method(&callee.object)
        }
        _ => None,
    }
}

fn is_this(expr: &Expression) -> bool {
    matches!(expr, Expression::ThisExpression(_))
}

fn is_this_member(expr: &Expression, property: &str) -> bool {
    matches!(
        expr,
        Expression::StaticMemberExpression(member)
            if is_this(&member.object) && member.property.name.as_str() == property
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
export default class Contribution {
  constructor(uiHandler) {
    this.uiHandler = uiHandler;
  }

  start() {
    this.uiHandler.on('btnApply', this.handleApply.bind(this));
    this.uiHandler.on("chkMode", this.onModeChange);
    this.other.on('ignored', this.handleApply);
    this._initDefaults();
  }

  handleApply(type, data) {
    const text = `}${data.value}`;
    this.uiHandler.render();
  }

  onModeChange(type, data) { this.mode = data.value; }

  _initDefaults() {
    this.mode = "a";
  }

  static helper() {}

  get value() { return 1; }

  formatValue(v) { return String(v); }
}
"#;

    #[test]
    fn test_bindings() {
        let ex = extract(SOURCE).unwrap();
        assert_eq!(ex.strategy, Strategy::Ast);
        let pairs: Vec<_> = ex
            .bindings
            .iter()
            .map(|b| (b.component_id.as_str(), b.handler_name.as_str()))
            .collect();
        assert_eq!(pairs, [("btnApply", "handleApply"), ("chkMode", "onModeChange")]);
    }

    #[test]
    fn test_methods() {
        let ex = extract(SOURCE).unwrap();
        let names: Vec<_> = ex.handlers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(
            names,
            ["start", "handleApply", "onModeChange", "_initDefaults", "formatValue"]
        );

        let apply = &ex.handlers[1];
        assert_eq!(apply.kind, HandlerKind::Event);
        assert_eq!(apply.params, "type, data");
        assert!(apply.body.starts_with('{'));
        assert!(apply.body.contains("`}${data.value}`"));
        assert!(apply.body.ends_with('}'));
        assert_eq!(&SOURCE[apply.offset..][..11], "handleApply");

        assert_eq!(ex.handlers[3].kind, HandlerKind::Init);
        assert_eq!(ex.handlers[4].kind, HandlerKind::Helper);
        assert_eq!(ex.handlers[4].params, "v");
    }

    #[test]
    fn test_syntax_error_is_none() {
        assert!(extract("class A { handleX( { }").is_none());
    }

    #[test]
    fn test_modifiers_recorded() {
        let ex = extract(
            "class A { async handleGo(type, data) { await fetch('/x'); } *onGen() { yield 1; } }",
        )
        .unwrap();
        let go = ex.handler("handleGo").unwrap();
        assert!(go.is_async && !go.is_generator);
        assert_eq!(go.modifiers(), "async ");
        let gen_method = ex.handler("onGen").unwrap();
        assert!(gen_method.is_generator && !gen_method.is_async);
    }

    #[test]
    fn test_only_behavior_class_is_read() {
        let ex = extract(
            r#"
class Helper {
  handleApply() { return "helper"; }
}

export default class WidgetContribution {
  start() {
    this.uiHandler.on('btnApply', this.handleApply.bind(this));
    const Inner = class {
      onInner() { this.uiHandler.on('inner', this.onInner); }
    };
  }
  handleApply(type, data) { return "widget"; }
  handleApply(type, data) { return "last"; }
}
"#,
        )
        .unwrap();
        let names: Vec<_> = ex.handlers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["start", "handleApply"]);
        assert_eq!(ex.handlers[1].body, r#"{ return "last"; }"#);
        let ids: Vec<_> = ex.bindings.iter().map(|b| b.component_id.as_str()).collect();
        assert_eq!(ids, ["btnApply"]);
    }

    #[test]
    fn test_first_class_without_exports() {
        let ex = extract("class A { handleA() {} } class B { handleB() {} }").unwrap();
        assert!(ex.handler("handleA").is_some());
        assert!(ex.handler("handleB").is_none());
    }
}
