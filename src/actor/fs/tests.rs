use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tempfile::TempDir;

use super::classifier::{EventClassifier, categorize_path};
use super::debouncer::Debouncer;
use super::router::{ReloadPlan, apply_plan};
use super::types::{ChangeKind, DebouncedEvents, FileCategory};
use crate::config::{PreviewConfig, test_parse_config};
use crate::core::PreviewContext;
use crate::reload::message::ReloadMessage;

const WINDOW: Duration = Duration::from_millis(200);

fn make_config(temp: &TempDir) -> PreviewConfig {
    let root = temp.path();
    for dir in ["htmlStore", "plugin", "styles/atoms"] {
        std::fs::create_dir_all(root.join(dir)).unwrap();
    }
    std::fs::write(root.join("htmlStore/Widget.html"), "<XDiv></XDiv>").unwrap();
    std::fs::write(root.join("styles/atoms/Button.css"), ".btn { color: red; }").unwrap();
    std::fs::write(root.join("styles/_vars.scss"), "$c: red;").unwrap();

    let mut config = test_parse_config(
        r#"
[paths]
plugin = "plugin"
styles_dir = "styles"

[styles]
command = ["rodix-preview-no-such-sass"]

[[styles.atoms]]
name = "Button"
path = "styles/atoms/Button.css"
"#,
    );
    config.finalize(root);
    config
}

fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

fn plan_for(config: &PreviewConfig, events: Vec<(PathBuf, ChangeKind)>) -> ReloadPlan {
    ReloadPlan::from_events(DebouncedEvents(events), config)
}

// ============================================================================
// debouncer
// ============================================================================

#[test]
fn test_debouncer_empty() {
    let debouncer = Debouncer::new(WINDOW);
    assert!(!debouncer.is_ready());
    assert!(debouncer.sleep_duration() >= Duration::from_secs(3600));
}

#[test]
fn test_event_routing_by_kind() {
    let mut debouncer = Debouncer::new(WINDOW);

    debouncer.add_event(&make_event(vec!["/tmp/a.html"], create_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/b.scss"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/c.js"], remove_kind()));

    assert_eq!(debouncer.changes.len(), 3);
    assert_eq!(debouncer.changes[&PathBuf::from("/tmp/a.html")], ChangeKind::Created);
    assert_eq!(debouncer.changes[&PathBuf::from("/tmp/b.scss")], ChangeKind::Modified);
    assert_eq!(debouncer.changes[&PathBuf::from("/tmp/c.js")], ChangeKind::Removed);
}

#[test]
fn test_temp_file_ignored() {
    let mut debouncer = Debouncer::new(WINDOW);
    debouncer.add_event(&make_event(vec!["/tmp/.Widget.html.swp"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/Widget.html~"], modify_kind()));
    assert!(debouncer.changes.is_empty());
    assert!(debouncer.last_event.is_none());
}

#[test]
fn test_dedup_transitions() {
    let mut debouncer = Debouncer::new(WINDOW);

    debouncer.add_event(&make_event(vec!["/tmp/a.html"], create_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/a.html"], modify_kind()));
    assert_eq!(debouncer.changes[&PathBuf::from("/tmp/a.html")], ChangeKind::Created);

    debouncer.add_event(&make_event(vec!["/tmp/b.html"], remove_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/b.html"], create_kind()));
    assert_eq!(debouncer.changes[&PathBuf::from("/tmp/b.html")], ChangeKind::Created);

    debouncer.add_event(&make_event(vec!["/tmp/c.html"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/c.html"], remove_kind()));
    assert_eq!(debouncer.changes[&PathBuf::from("/tmp/c.html")], ChangeKind::Removed);

    debouncer.add_event(&make_event(vec!["/tmp/a.html"], remove_kind()));
    assert!(!debouncer.changes.contains_key(&PathBuf::from("/tmp/a.html")));
}

#[test]
fn test_ready_after_window() {
    let mut debouncer = Debouncer::new(Duration::from_millis(20));
    debouncer.add_event(&make_event(vec!["/tmp/a.html"], modify_kind()));
    assert!(debouncer.take_if_ready().is_none());
    assert!(debouncer.sleep_duration() <= Duration::from_millis(20));

    std::thread::sleep(Duration::from_millis(30));
    let changes = debouncer.take_if_ready().unwrap();
    assert_eq!(changes.len(), 1);
    assert!(debouncer.take_if_ready().is_none());
}

// ============================================================================
// classifier
// ============================================================================

#[test]
fn test_categorize_path() {
    let temp = TempDir::new().unwrap();
    let config = make_config(&temp);
    let root = config.get_root();

    let cases = [
        ("htmlStore/Widget.html", FileCategory::Document),
        ("htmlStore/Other.html", FileCategory::Other),
        ("plugin/WidgetContribution.js", FileCategory::Plugin),
        ("styles/atoms/Button.css", FileCategory::Style),
        ("styles/_vars.scss", FileCategory::Partial),
        ("styles/notes.txt", FileCategory::Other),
    ];
    for (path, expected) in cases {
        assert_eq!(categorize_path(&root.join(path), &config), expected, "{path}");
    }
}

#[test]
fn test_correct_by_existence() {
    let temp = TempDir::new().unwrap();
    let present = temp.path().join("present.html");
    std::fs::write(&present, "").unwrap();
    let gone = temp.path().join("gone.html");

    let mut changes = FxHashMap::default();
    changes.insert(present.clone(), ChangeKind::Removed);
    changes.insert(gone.clone(), ChangeKind::Modified);
    changes.insert(temp.path().join("flash.html"), ChangeKind::Created);

    EventClassifier::correct_by_existence(&mut changes);
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[&present], ChangeKind::Modified);
    assert_eq!(changes[&gone], ChangeKind::Removed);
}

#[test]
fn test_classify_drops_unrelated_paths() {
    let temp = TempDir::new().unwrap();
    let config = make_config(&temp);
    let unrelated = temp.path().join("README.md");
    std::fs::write(&unrelated, "").unwrap();

    let mut raw = FxHashMap::default();
    raw.insert(unrelated, ChangeKind::Modified);
    assert!(EventClassifier::classify(raw, &config).is_none());

    let mut raw = FxHashMap::default();
    raw.insert(config.paths.document.clone(), ChangeKind::Modified);
    let events = EventClassifier::classify(raw, &config).unwrap();
    assert_eq!(events.0.len(), 1);
}

// ============================================================================
// router
// ============================================================================

#[test]
fn test_document_change_reloads() {
    let temp = TempDir::new().unwrap();
    let config = make_config(&temp);
    let plan = plan_for(&config, vec![(config.paths.document.clone(), ChangeKind::Modified)]);
    assert!(plan.document_changed);

    let mut context = PreviewContext::new(Arc::new(config));
    let messages = apply_plan(&plan, &mut context);
    assert_eq!(messages, [ReloadMessage::reload("Widget.html changed")]);
}

#[test]
fn test_document_removed_only_notifies() {
    let temp = TempDir::new().unwrap();
    let config = make_config(&temp);
    let plugin = temp.path().join("plugin/WidgetContribution.js");
    let plan = plan_for(
        &config,
        vec![
            (config.paths.document.clone(), ChangeKind::Removed),
            (plugin, ChangeKind::Modified),
        ],
    );

    let mut context = PreviewContext::new(Arc::new(config));
    let messages = apply_plan(&plan, &mut context);
    assert_eq!(messages, [ReloadMessage::deleted("Widget.html")]);
}

#[test]
fn test_partial_change_sends_css() {
    let temp = TempDir::new().unwrap();
    let config = make_config(&temp);
    let partial = temp.path().join("styles/_vars.scss");
    let plan = plan_for(&config, vec![(partial, ChangeKind::Modified)]);
    assert!(plan.partials_changed);

    let mut context = PreviewContext::new(Arc::new(config));
    let messages = apply_plan(&plan, &mut context);
    assert_eq!(messages.len(), 1);
    let ReloadMessage::Css { content, .. } = &messages[0] else {
        panic!("expected css, got {:?}", messages[0]);
    };
    assert!(content.contains(".btn"));
}

#[test]
fn test_full_reload_supersedes_css() {
    let temp = TempDir::new().unwrap();
    let config = make_config(&temp);
    let plan = plan_for(
        &config,
        vec![
            (config.paths.document.clone(), ChangeKind::Modified),
            (temp.path().join("styles/_vars.scss"), ChangeKind::Modified),
        ],
    );

    let mut context = PreviewContext::new(Arc::new(config));
    let messages = apply_plan(&plan, &mut context);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind(), "reload");
}

#[test]
fn test_plugin_change_sends_behavior() {
    let temp = TempDir::new().unwrap();
    let config = make_config(&temp);
    let plugin = temp.path().join("plugin/WidgetContribution.js");
    let plan = plan_for(&config, vec![(plugin, ChangeKind::Removed)]);

    let mut context = PreviewContext::new(Arc::new(config));
    let messages = apply_plan(&plan, &mut context);
    assert_eq!(messages, [ReloadMessage::behavior("plugin removed")]);
}

#[test]
fn test_unchanged_catalog_sends_nothing() {
    let temp = TempDir::new().unwrap();
    let config = make_config(&temp);
    let button = temp.path().join("styles/atoms/Button.css");
    let plan = plan_for(&config, vec![(button, ChangeKind::Modified)]);
    assert!(plan.styles_changed);

    // Compiled at startup and untouched since
    let mut context = PreviewContext::new(Arc::new(config));
    assert!(apply_plan(&plan, &mut context).is_empty());
}
