//! Lexical extraction, used when the source does not parse.
//!
//! Method signatures and bindings are located with patterns over a copy of
//! the source whose comments are blanked out; bodies are delimited by brace
//! matching that skips string, template and comment literals. Regex
//! literals containing braces are not recognized and can cut a body short.

use super::{
    EventKind, Extraction, HandlerDescriptor, HandlerKind, PluginBinding, Strategy, push_method,
};
use regex::Regex;
use std::sync::LazyLock;

static BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"this\.uiHandler\.on\(\s*['"]([^'"]+)['"]\s*,\s*this\.(\w+)(?:\.bind\(\s*this\s*\))?\s*\)"#,
    )
    .expect("valid binding pattern")
});

static METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(async[ \t]+)?(\*[ \t]*)?(handle\w+|on\w+|_\w+)[ \t]*\(([^)]*)\)\s*\{",
    )
    .expect("valid method pattern")
});

pub(super) fn extract(source: &str) -> Extraction {
    let code = blank_comments(source);

    let bindings = BINDING
        .captures_iter(&code)
        .map(|cap| PluginBinding {
            component_id: cap[1].to_string(),
            handler_name: cap[2].to_string(),
            event_kind: EventKind::UiHandlerOn,
        })
        .collect();

    let mut handlers = Vec::new();
    for cap in METHOD.captures_iter(&code) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(3)) else {
            continue;
        };
        let open = whole.end() - 1;
        let body = matching_brace(source, open)
            .map(|end| source[open..end].to_string())
            .unwrap_or_default();
        push_method(
            &mut handlers,
            HandlerDescriptor {
                name: name.as_str().to_string(),
                params: cap[4].trim().to_string(),
                body,
                offset: name.start(),
                kind: HandlerKind::classify(name.as_str()),
                is_async: cap.get(1).is_some(),
                is_generator: cap.get(2).is_some(),
            },
        );
    }

    Extraction {
        bindings,
        handlers,
        strategy: Strategy::Lexical,
    }
}

// ============================================================================
// Scanning
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Code with the current brace depth.
    Code(usize),
    Template,
}

/// Index one past the `}` that closes the `{` at `open`.
pub(super) fn matching_brace(src: &str, open: usize) -> Option<usize> {
    let b = src.as_bytes();
    if b.get(open) != Some(&b'{') {
        return None;
    }

    let mut stack = vec![Frame::Code(0)];
    let mut i = open;
    while i < b.len() {
        let c = b[i];
        match *stack.last()? {
            Frame::Code(depth) => match c {
                b'{' => set_top(&mut stack, Frame::Code(depth + 1)),
                b'}' => {
                    let depth = depth.saturating_sub(1);
                    if depth > 0 {
                        set_top(&mut stack, Frame::Code(depth));
                    } else if stack.len() == 1 {
                        return Some(i + 1);
                    } else {
                        stack.pop();
                    }
                }
                b'\'' | b'"' => i = skip_string(b, i)?,
                b'`' => stack.push(Frame::Template),
                b'/' => i = skip_comment(b, i),
                _ => {}
            },
            Frame::Template => match c {
                b'\\' => i += 1,
                b'`' => {
                    stack.pop();
                }
                b'$' if b.get(i + 1) == Some(&b'{') => {
                    stack.push(Frame::Code(1));
                    i += 1;
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

fn set_top(stack: &mut [Frame], frame: Frame) {
    if let Some(top) = stack.last_mut() {
        *top = frame;
    }
}

/// Index of the closing quote of the string starting at `start`.
/// An unterminated string ends at the line break.
fn skip_string(b: &[u8], start: usize) -> Option<usize> {
    let quote = b[start];
    let mut j = start + 1;
    while j < b.len() {
        match b[j] {
            b'\\' => j += 1,
            b'\n' => return Some(j),
            c if c == quote => return Some(j),
            _ => {}
        }
        j += 1;
    }
    None
}

/// If a comment starts at `start`, the index of its last byte; otherwise
/// `start` itself.
fn skip_comment(b: &[u8], start: usize) -> usize {
    match b.get(start + 1) {
        Some(b'/') => b[start..]
            .iter()
            .position(|&c| c == b'\n')
            .map_or(b.len(), |p| start + p),
        Some(b'*') => b[start + 2..]
            .windows(2)
            .position(|w| w == b"*/")
            .map_or(b.len(), |p| start + 2 + p + 1),
        _ => start,
    }
}

/// Copy of `src` with comment bytes replaced by spaces (newlines kept), so
/// byte offsets stay valid.
fn blank_comments(src: &str) -> String {
    let b = src.as_bytes();
    let mut out = b.to_vec();
    let mut i = 0;
    while i < b.len() {
        match b[i] {
            b'\'' | b'"' => i = skip_string(b, i).unwrap_or(b.len()),
            b'`' => {
                i += 1;
                while i < b.len() && b[i] != b'`' {
                    if b[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'/' if matches!(b.get(i + 1), Some(b'/' | b'*')) => {
                let end = skip_comment(b, i).min(b.len().saturating_sub(1));
                for byte in &mut out[i..=end] {
                    if *byte != b'\n' {
                        *byte = b' ';
                    }
                }
                i = end;
            }
            _ => {}
        }
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| src.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(src: &str) -> &str {
        let open = src.find('{').unwrap();
        &src[open..matching_brace(src, open).unwrap()]
    }

    #[test]
    fn test_nested_braces() {
        assert_eq!(body_at("f() { if (a) { b(); } } tail"), "{ if (a) { b(); } }");
    }

    #[test]
    fn test_braces_in_strings_and_comments() {
        let src = r#"f() { const s = "}"; const t = '{'; // }
  /* { */ return s; } tail"#;
        assert!(body_at(src).ends_with("return s; }"));
    }

    #[test]
    fn test_template_literals() {
        let src = "f() { const s = `}${ {a: 1}.a }{`; return s; } tail";
        assert!(body_at(src).ends_with("return s; }"));
    }

    #[test]
    fn test_unbalanced_is_none() {
        assert!(matching_brace("{ a { b }", 0).is_none());
        assert!(matching_brace("x", 0).is_none());
    }

    #[test]
    fn test_blank_comments_keeps_offsets() {
        let src = "a // c}\nb /* {x} */ c 'not // comment'";
        let blanked = blank_comments(src);
        assert_eq!(blanked.len(), src.len());
        assert!(!blanked.contains('}'));
        assert!(blanked.contains("'not // comment'"));
    }

    #[test]
    fn test_extract() {
        let src = r#"
class Demo {
  start() {
    this.uiHandler.on('btnGo', this.handleGo.bind(this));
    // this.uiHandler.on('btnOld', this.handleOld.bind(this));
    this.uiHandler.on("sel", this.onSelect);
  }

  handleGo(type, data) {
    const msg = "}";
    this.uiHandler.render();
  }

  onSelect(type, data) {}

  _initState() {
    this.state = { a: 1 };
  }
}
"#;
        let ex = extract(src);
        assert_eq!(ex.strategy, Strategy::Lexical);
        let ids: Vec<_> = ex.bindings.iter().map(|b| b.component_id.as_str()).collect();
        assert_eq!(ids, ["btnGo", "sel"]);

        let names: Vec<_> = ex.handlers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["handleGo", "onSelect", "_initState"]);
        assert!(ex.handlers[0].body.contains("const msg = \"}\";"));
        assert!(ex.handlers[0].body.ends_with("render();\n  }"));
        assert_eq!(ex.handlers[0].params, "type, data");
        assert_eq!(ex.handlers[2].kind, HandlerKind::Init);
        assert_eq!(&src[ex.handlers[0].offset..][..8], "handleGo");
    }

    #[test]
    fn test_modifiers_and_redefinitions() {
        let src = "
class Demo {
  async handleGo(type, data) {
    await fetch('/x');
  }
  *onTick() { yield 1; }
  handleGo() { return 2; }
}
";
        let ex = extract(src);
        let names: Vec<_> = ex.handlers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["handleGo", "onTick"]);
        assert!(!ex.handlers[0].is_async);
        assert_eq!(ex.handlers[0].body, "{ return 2; }");
        assert!(ex.handlers[1].is_generator);
        assert_eq!(ex.handlers[1].modifiers(), "*");
    }
}
