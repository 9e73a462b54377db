//! End-to-end tests: Java sources on disk in, model document out

use std::fs;
use std::path::Path;
use std::process::Command;

use clap::Parser;
use serde_json::Value;
use tempfile::tempdir;
use umlgen_cli::{Cli, UmlgenApp};

const DOOR: &str = r#"
package demo;

public class Door implements Openable {
    private Lock lock;

    @Trigger(from = "InitState", to = "Closed")
    public void init() {}

    @Triggers({
        @Trigger(from = "Closed", to = "Opened"),
        @Trigger(from = "Opened", to = "FinalState")
    })
    public void toggle() {}

    @SendMessage(from = "User", to = "Door")
    public void knock() {}
}
"#;

const OPENABLE: &str = "public interface Openable { void open(); }";

const LOCK: &str = "class Lock { boolean engaged; }";

fn write_sources(dir: &Path) {
    fs::write(dir.join("Door.java"), DOOR).unwrap();
    fs::write(dir.join("Openable.java"), OPENABLE).unwrap();
    let nested = dir.join("util");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("Lock.java"), LOCK).unwrap();
    fs::write(dir.join("README.txt"), "not java").unwrap();
}

fn run(args: &[&str]) -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(args)?;
    UmlgenApp::new()?.run(cli)
}

fn read_document(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn names(elements: &Value) -> Vec<String> {
    elements
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_source_tree_to_document() {
    let src = tempdir().unwrap();
    write_sources(src.path());
    let out = tempdir().unwrap();
    let output = out.path().join("model.mdj");

    run(&[
        "umlgen",
        src.path().to_str().unwrap(),
        output.to_str().unwrap(),
    ])
    .unwrap();

    let document = read_document(&output);
    assert_eq!(document["_type"], "Project");
    assert_eq!(document["_id"], "286331153");
    assert_eq!(document["name"], "projectName");

    let model = &document["ownedElements"][0];
    assert_eq!(model["_type"], "UMLModel");
    // Diagram first, then classes in file name order
    assert_eq!(
        names(&model["ownedElements"]),
        vec!["Main", "Door", "Openable", "Lock"]
    );

    let door = &model["ownedElements"][1];
    let realization = &door["ownedElements"][0];
    assert_eq!(realization["_type"], "UMLInterfaceRealization");
    assert_eq!(
        realization["target"]["$ref"],
        model["ownedElements"][2]["_id"]
    );

    let lock = &model["ownedElements"][3];
    let association = &lock["ownedElements"][0];
    assert_eq!(association["_type"], "UMLAssociation");
    assert_eq!(association["end2"]["aggregation"], "shared");
    assert_eq!(association["end2"]["reference"]["$ref"], door["_id"]);

    let machine = &document["ownedElements"][1];
    assert_eq!(machine["_type"], "UMLStateMachine");
    let region = &machine["regions"][0];
    assert_eq!(region["vertices"].as_array().unwrap().len(), 4);
    assert_eq!(region["transitions"].as_array().unwrap().len(), 3);

    let collaboration = &document["ownedElements"][2];
    assert_eq!(collaboration["_type"], "UMLCollaboration");
    let interaction = &collaboration["ownedElements"][0];
    assert_eq!(names(&interaction["participants"]), vec!["User", "Door"]);
    assert_eq!(interaction["messages"][0]["name"], "knock()");
}

#[test]
fn test_output_directory_gets_default_name() {
    let src = tempdir().unwrap();
    fs::write(src.path().join("A.java"), "class A {}").unwrap();
    let out = tempdir().unwrap();

    run(&[
        "umlgen",
        src.path().to_str().unwrap(),
        out.path().to_str().unwrap(),
    ])
    .unwrap();

    let document = read_document(&out.path().join("uml.mdj"));
    assert_eq!(document["ownedElements"].as_array().unwrap().len(), 1);
}

#[test]
fn test_syntax_errors_are_skipped() {
    let src = tempdir().unwrap();
    fs::write(src.path().join("Broken.java"), "class Broken { void }}").unwrap();
    fs::write(src.path().join("Good.java"), "class Good {}").unwrap();
    let output = src.path().join("out.mdj");

    run(&[
        "umlgen",
        src.path().to_str().unwrap(),
        output.to_str().unwrap(),
        "--compact",
    ])
    .unwrap();

    let raw = fs::read_to_string(&output).unwrap();
    assert!(!raw.contains('\n'));
    let document: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        names(&document["ownedElements"][0]["ownedElements"]),
        vec!["Main", "Good"]
    );
}

#[test]
fn test_custom_seed_and_project_name() {
    let src = tempdir().unwrap();
    fs::write(src.path().join("A.java"), "class A {}").unwrap();
    let output = src.path().join("out.mdj");

    run(&[
        "umlgen",
        src.path().to_str().unwrap(),
        output.to_str().unwrap(),
        "--id-seed",
        "0x10",
        "--project-name",
        "shop",
    ])
    .unwrap();

    let document = read_document(&output);
    assert_eq!(document["_id"], "16");
    assert_eq!(document["name"], "shop");
}

#[test]
fn test_malformed_annotation_fails() {
    let src = tempdir().unwrap();
    fs::write(
        src.path().join("A.java"),
        r#"class A { @Trigger(from = "X", to = 1) void go() {} }"#,
    )
    .unwrap();
    let output = src.path().join("out.mdj");

    let err = run(&[
        "umlgen",
        src.path().to_str().unwrap(),
        output.to_str().unwrap(),
    ])
    .unwrap_err();
    assert!(format!("{:#}", err).contains("@Trigger"));
    assert!(!output.exists());
}

#[test]
fn test_missing_source_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(run(&["umlgen", missing.to_str().unwrap()]).is_err());
}

#[test]
fn test_binary_rejects_extra_arguments() {
    let output = Command::new(env!("CARGO_BIN_EXE_umlgen"))
        .args(["a", "b", "c"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_binary_reports_errors() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let output = Command::new(env!("CARGO_BIN_EXE_umlgen"))
        .arg(&missing)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_unwritable_output_fails() {
    let src = tempdir().unwrap();
    fs::write(src.path().join("A.java"), "class A {}").unwrap();
    let output = src.path().join("no").join("such").join("out.mdj");

    let err = run(&[
        "umlgen",
        src.path().to_str().unwrap(),
        output.to_str().unwrap(),
    ])
    .unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to write output file"));
    assert!(!output.exists());
}

#[test]
fn test_binary_unwritable_output_exits_with_error() {
    let src = tempdir().unwrap();
    fs::write(src.path().join("A.java"), "class A {}").unwrap();
    let output = src.path().join("missing").join("out.mdj");

    let result = Command::new(env!("CARGO_BIN_EXE_umlgen"))
        .arg(src.path())
        .arg(&output)
        .output()
        .unwrap();
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Error: Failed to write output file"));
}

#[test]
fn test_seed_without_headroom_fails() {
    let src = tempdir().unwrap();
    fs::write(src.path().join("A.java"), "class A {}").unwrap();
    let output = src.path().join("out.mdj");

    let err = run(&[
        "umlgen",
        src.path().to_str().unwrap(),
        output.to_str().unwrap(),
        "--id-seed",
        "0xFFFFFFFFFFFFFFFF",
    ])
    .unwrap_err();
    assert!(format!("{:#}", err).contains("Identifier space exhausted"));
    assert!(!output.exists());
}
