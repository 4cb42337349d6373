//! Build script for minifying the embedded browser runtime and page assets.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use std::fs;
use std::path::Path;

const JS_ASSETS: [(&str, &str); 3] = [
    ("src/embed/runtime/rodix.js", "rodix.min.js"),
    ("src/embed/serve/hotreload.js", "hotreload.min.js"),
    ("src/embed/serve/toolbar.js", "toolbar.min.js"),
];

const CSS_ASSETS: [(&str, &str); 2] = [
    ("src/embed/runtime/rodix.css", "rodix.min.css"),
    ("src/embed/serve/chrome.css", "chrome.min.css"),
];

/// Identifiers the server substitutes at render time. They must survive
/// minification untouched.
const PLACEHOLDERS: [(&str, &str); 2] = [
    ("src/embed/runtime/rodix.js", "__RODIX_RULES__"),
    ("src/embed/serve/hotreload.js", "__RODIX_WS_PORT__"),
];

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let out_path = Path::new(&out_dir);

    for (input, output) in JS_ASSETS {
        minify_js_file(input, &out_path.join(output));
        println!("cargo:rerun-if-changed={input}");
    }
    for (input, output) in CSS_ASSETS {
        minify_css_file(input, &out_path.join(output));
        println!("cargo:rerun-if-changed={input}");
    }

    for (input, placeholder) in PLACEHOLDERS {
        let name = Path::new(input).file_stem().unwrap().to_string_lossy();
        let minified = fs::read_to_string(out_path.join(format!("{name}.min.js"))).unwrap();
        assert!(
            minified.contains(placeholder),
            "{input}: placeholder {placeholder} lost during minification"
        );
    }
}

fn minify_js(source: &str) -> String {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();

    let ret = Parser::new(&allocator, source, source_type).parse();
    assert!(ret.errors.is_empty(), "Parse errors: {:?}", ret.errors);

    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);

    Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code
}

fn minify_js_file(input: &str, output: &Path) {
    let source = fs::read_to_string(input).expect("Failed to read JS file");
    let code = minify_js(&source);
    fs::write(output, code).expect("Failed to write minified JS");
}

fn minify_css(source: &str) -> String {
    let stylesheet =
        StyleSheet::parse(source, ParserOptions::default()).expect("Failed to parse CSS");
    stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .expect("Failed to minify CSS")
        .code
}

fn minify_css_file(input: &str, output: &Path) {
    let source = fs::read_to_string(input).expect("Failed to read CSS file");
    let code = minify_css(&source);
    fs::write(output, code).expect("Failed to write minified CSS");
}
