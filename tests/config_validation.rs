// tests/config_validation.rs

use std::path::PathBuf;

use tempfile::TempDir;
use tickdag::config::load_and_validate;
use tickdag::errors::TickdagError;

fn write_workflow(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("Tickdag.toml");
    std::fs::write(&path, contents).expect("write workflow file");
    (dir, path)
}

#[test]
fn valid_workflow_loads_and_flattens() {
    let (_dir, path) = write_workflow(
        r#"
[step.build]
cmd = "cargo build"
next = ["lint", "test"]

[step.test]
cmd = "cargo test"

[step.lint]
cmd = "cargo clippy"
"#,
    );

    let workflow = load_and_validate(&path).expect("workflow should validate");
    assert_eq!(workflow.len(), 3);

    let steps = workflow.to_steps();
    // BTreeMap-backed, so flattening is in id order.
    let ids: Vec<&str> = steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["build", "lint", "test"]);

    let commands = workflow.commands();
    assert_eq!(commands["build"], "cargo build");
    assert_eq!(commands["lint"], "cargo clippy");
}

#[test]
fn empty_workflow_file_is_allowed() {
    let (_dir, path) = write_workflow("");
    let workflow = load_and_validate(&path).expect("empty workflow is valid");
    assert!(workflow.is_empty());
}

#[test]
fn unknown_successor_is_rejected() {
    let (_dir, path) = write_workflow(
        r#"
[step.a]
cmd = "echo a"
next = ["ghost"]
"#,
    );

    match load_and_validate(&path) {
        Err(TickdagError::UnknownSuccessor { step, successor }) => {
            assert_eq!(step, "a");
            assert_eq!(successor, "ghost");
        }
        other => panic!("expected UnknownSuccessor, got {other:?}"),
    }
}

#[test]
fn self_reference_is_rejected() {
    let (_dir, path) = write_workflow(
        r#"
[step.a]
cmd = "echo a"
next = ["a"]
"#,
    );

    assert!(matches!(
        load_and_validate(&path),
        Err(TickdagError::InvalidWorkflow(_))
    ));
}

#[test]
fn cycles_are_rejected() {
    let (_dir, path) = write_workflow(
        r#"
[step.a]
cmd = "echo a"
next = ["b"]

[step.b]
cmd = "echo b"
next = ["c"]

[step.c]
cmd = "echo c"
next = ["a"]
"#,
    );

    assert!(matches!(
        load_and_validate(&path),
        Err(TickdagError::DagCycle(_))
    ));
}

#[test]
fn empty_command_is_rejected() {
    let (_dir, path) = write_workflow(
        r#"
[step.a]
cmd = "   "
"#,
    );

    assert!(matches!(
        load_and_validate(&path),
        Err(TickdagError::InvalidWorkflow(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("does-not-exist.toml");

    assert!(matches!(
        load_and_validate(&path),
        Err(TickdagError::IoError(_))
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let (_dir, path) = write_workflow("[step.a\ncmd = broken");

    assert!(matches!(
        load_and_validate(&path),
        Err(TickdagError::TomlError(_))
    ));
}
