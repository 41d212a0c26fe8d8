//! Command-line behavior of the `classdoc` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const COMPONENT: &str = "/**\n * @class Ext.Component\n * Base widget.\n */\n\
/**\n * @method show\n * Shows it.\n * @chainable\n */\nshow: function () {},\n";

const PANEL: &str = "/**\n * @class Ext.Panel\n * @extends Ext.Component\n * A panel.\n */\n";

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/Component.js"), COMPONENT).unwrap();
    fs::write(dir.path().join("src/Panel.js"), PANEL).unwrap();
    dir
}

fn classdoc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("classdoc").unwrap();
    cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_json_output_lists_classes() {
    let dir = project();
    let output = classdoc(dir.path())
        .args(["src", "--format", "json", "-q"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let names: Vec<_> = json["classes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Ext.Component", "Ext.Panel"]);
    assert!(json["diagnostics"].as_array().unwrap().is_empty());
}

#[test]
fn test_text_output_summarizes_run() {
    let dir = project();
    classdoc(dir.path())
        .args(["src", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Classes: 2"))
        .stdout(predicate::str::contains("Ext.Panel extends Ext.Component"));
}

#[test]
fn test_output_file_is_written() {
    let dir = project();
    let out = dir.path().join("docs.json");
    classdoc(dir.path())
        .args(["src", "-f", "json", "-q", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let json: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["classes"].as_array().unwrap().len(), 2);
}

#[test]
fn test_parse_error_fails_without_output() {
    let dir = project();
    fs::write(dir.path().join("src/Broken.js"), "/**\n * @class Broken\n").unwrap();
    let out = dir.path().join("docs.json");

    classdoc(dir.path())
        .args(["src", "-f", "json", "-q", "-o"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Broken.js"));
    assert!(!out.exists());
}

#[test]
fn test_external_option_silences_unknown_parent() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Grid.js"),
        "/**\n * @class My.Grid\n * @extends Vendor.Grid\n * Grid.\n */\n",
    )
    .unwrap();

    let run = |extra: &[&str]| {
        let output = classdoc(dir.path())
            .args(["Grid.js", "-f", "json", "-q"])
            .args(extra)
            .output()
            .unwrap();
        assert!(output.status.success());
        let json: Value = serde_json::from_slice(&output.stdout).unwrap();
        json["diagnostics"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|d| d["kind"] == "unresolved_reference")
            .count()
    };

    assert_eq!(run(&[]), 1);
    assert_eq!(run(&["--external", "Vendor.*"]), 0);
}

#[test]
fn test_ignored_files_are_not_parsed() {
    let dir = project();
    fs::create_dir(dir.path().join("src/vendor")).unwrap();
    fs::write(dir.path().join("src/vendor/Broken.js"), "/**\n * @class Broken\n").unwrap();

    classdoc(dir.path())
        .args(["src", "-q"])
        .assert()
        .failure();
    classdoc(dir.path())
        .args(["src", "-q", "--ignore", "**/vendor/**"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Classes: 2"));
}

#[test]
fn test_missing_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    classdoc(dir.path())
        .args(["does-not-exist.js", "-q"])
        .assert()
        .failure();
}
