use super::*;
use crate::kernel::services::ports::{DcdConfig, Position};
use crate::models::TextBuffer;
use std::path::PathBuf;
use std::time::Duration;

#[cfg(unix)]
fn fake_client(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join("dcd-client-stub");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write stub");
    let mut perms = std::fs::metadata(&path).expect("stat stub").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod stub");
    path
}

#[cfg(unix)]
fn model_with(stub: &std::path::Path) -> DcdCompletion {
    let config = DcdConfig::default()
        .with_command(stub.to_str().expect("utf8 path"))
        .with_timeout(Duration::from_secs(5));
    DcdCompletion::new(Arc::new(DcdService::new(config).expect("runtime")))
}

fn document() -> Document {
    Document::new(
        PathBuf::from("/tmp/app.d"),
        TextBuffer::from_text("import std.stdio;\nvoid main() {\n    writel\n}\n"),
    )
}

fn word_range(line: usize, start: usize, end: usize) -> QueryRange {
    QueryRange::new(Position::new(line, start), Position::new(line, end))
}

fn labels(model: &DcdCompletion) -> Vec<String> {
    model
        .candidates()
        .iter()
        .map(|c| c.label.to_string())
        .collect()
}

#[test]
#[cfg(unix)]
fn explicit_invocation_replaces_candidates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stub = fake_client(&dir, "printf 'writeln void\\nwritef void\\n'");
    let model = model_with(&stub);

    model.invoked(&document(), word_range(2, 4, 10), InvocationKind::Explicit);
    assert_eq!(labels(&model), vec!["writeln", "writef"]);
}

#[test]
#[cfg(unix)]
fn narrow_automatic_invocation_clears_without_calling_client() {
    let dir = tempfile::tempdir().expect("tempdir");
    let capture = dir.path().join("calls.txt");
    let stub = fake_client(
        &dir,
        &format!("echo \"$@\" >> {}\nprintf 'writeln void\\n'", capture.display()),
    );
    let model = model_with(&stub);

    model.invoked(&document(), word_range(2, 4, 10), InvocationKind::Explicit);
    assert_eq!(labels(&model), vec!["writeln"]);

    model.invoked(&document(), word_range(2, 4, 6), InvocationKind::Automatic);
    assert!(labels(&model).is_empty());

    let calls = std::fs::read_to_string(&capture).expect("read capture");
    assert_eq!(calls.lines().count(), 1, "client ran for the narrow trigger");
}

#[test]
#[cfg(unix)]
fn wide_automatic_invocation_queries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stub = fake_client(&dir, "printf 'writeln void\\n'");
    let model = model_with(&stub);

    model.invoked(&document(), word_range(2, 4, 7), InvocationKind::Automatic);
    assert_eq!(labels(&model), vec!["writeln"]);
}

#[test]
#[cfg(unix)]
fn explicit_invocation_ignores_width_threshold() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stub = fake_client(&dir, "printf 'writeln void\\n'");
    let model = model_with(&stub);

    model.invoked(&document(), word_range(2, 4, 5), InvocationKind::Explicit);
    assert_eq!(labels(&model), vec!["writeln"]);
}

#[test]
#[cfg(unix)]
fn failing_client_yields_empty_candidates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ok_stub = fake_client(&dir, "printf 'writeln void\\n'");
    let model = model_with(&ok_stub);
    model.invoked(&document(), word_range(2, 4, 10), InvocationKind::Explicit);
    assert!(!labels(&model).is_empty());

    let dir = tempfile::tempdir().expect("tempdir");
    let failing = fake_client(&dir, "printf 'ignored output\\n'; exit 1");
    let model = model_with(&failing);
    model.invoked(&document(), word_range(2, 4, 10), InvocationKind::Explicit);
    assert!(labels(&model).is_empty());
}

#[test]
#[cfg(unix)]
fn tree_presents_header_then_leaves() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stub = fake_client(&dir, "printf 'writeln void\\nwritef void\\n'");
    let model = model_with(&stub);

    assert_eq!(model.row_count(NodeRef::Root), 0);

    model.invoked(&document(), word_range(2, 4, 10), InvocationKind::Explicit);

    assert_eq!(model.row_count(NodeRef::Root), 1);
    assert_eq!(model.row_count(NodeRef::Header), 2);
    assert_eq!(model.row_count(NodeRef::Leaf(0)), 0);

    assert_eq!(model.parent(NodeRef::Root), None);
    assert_eq!(model.parent(NodeRef::Header), Some(NodeRef::Root));
    assert_eq!(model.parent(NodeRef::Leaf(1)), Some(NodeRef::Header));

    assert_eq!(model.label(NodeRef::Root), None);
    assert_eq!(model.label(NodeRef::Header).unwrap(), GROUP_TITLE);
    assert_eq!(model.label(NodeRef::Leaf(1)).unwrap(), "writef");
    assert_eq!(model.label(NodeRef::Leaf(9)), None);
}

#[test]
#[cfg(unix)]
fn newer_request_supersedes_inflight_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stub = fake_client(
        &dir,
        "case \"$1\" in\n-c17) sleep 1; printf 'slow void\\n';;\n*) printf 'fast void\\n';;\nesac",
    );
    let model = model_with(&stub);
    let doc = document();

    std::thread::scope(|scope| {
        // offset 17: end of the first line
        scope.spawn(|| model.invoked(&doc, word_range(0, 14, 17), InvocationKind::Explicit));
        std::thread::sleep(Duration::from_millis(300));
        scope.spawn(|| model.invoked(&doc, word_range(1, 10, 13), InvocationKind::Explicit));
    });

    assert_eq!(labels(&model), vec!["fast"]);
}
