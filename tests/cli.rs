//! End-to-end runs of the `tmplc` binary against `tests/fixtures/`.

#![allow(deprecated)]

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn tmplc() -> Command {
    Command::cargo_bin("tmplc").unwrap()
}

#[test]
fn compile_writes_rust_function_named_after_input() {
    let temp = tempfile::tempdir().unwrap();

    tmplc()
        .arg("compile")
        .arg(fixture("list.tmpl"))
        .arg(temp.path())
        .arg("--config")
        .arg(fixture("mustache.json"))
        .arg("--context-type")
        .arg("ListContext")
        .assert()
        .success();

    let src = fs::read_to_string(temp.path().join("list.rs")).unwrap();
    assert!(src.contains("pub fn list<E>("));
    assert!(src.contains("    ctx: &ListContext,"));
    assert!(src.contains(" for item in &ctx.items { "));
}

#[test]
fn compile_json_then_render_artifact_to_file() {
    let temp = tempfile::tempdir().unwrap();
    let out = temp.path().join("greeting.html");

    tmplc()
        .arg("compile")
        .arg(fixture("greeting.tmpl"))
        .arg(temp.path())
        .args(["--format", "json", "--markers", "=!"])
        .assert()
        .success();
    let artifact = temp.path().join("greeting.json");
    assert!(artifact.is_file());

    tmplc()
        .arg("render")
        .arg(&artifact)
        .arg("--context")
        .arg(fixture("greeting.json"))
        .args(["--escape", "="])
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let expected = fs::read_to_string(fixture("greeting.expected")).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), expected);
}

#[test]
fn render_template_to_stdout() {
    let expected = fs::read_to_string(fixture("greeting.expected")).unwrap();

    tmplc()
        .arg("render")
        .arg(fixture("greeting.tmpl"))
        .arg("--context")
        .arg(fixture("greeting.json"))
        .args(["--markers", "=!", "--escape", "="])
        .assert()
        .success()
        .stdout(predicate::str::diff(expected));
}

#[test]
fn compile_rejects_names_that_escape_output_dir() {
    let temp = tempfile::tempdir().unwrap();
    let out = temp.path().join("out");

    for name in ["../x", "", "fn"] {
        tmplc()
            .arg("compile")
            .arg(fixture("greeting.tmpl"))
            .arg(&out)
            .args(["--format", "json", "--name", name])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not a valid artifact name"));
    }

    assert!(!temp.path().join("x.json").exists());
    assert!(!out.exists());
}

#[test]
fn compile_suffixes_keyword_file_stems() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("match.tmpl");
    fs::write(&input, "<%= 1 + 1 %>").unwrap();

    tmplc()
        .arg("compile")
        .arg(&input)
        .arg(temp.path())
        .assert()
        .success();

    let src = fs::read_to_string(temp.path().join("match_.rs")).unwrap();
    assert!(src.contains("pub fn match_<E>("));
}

#[test]
fn compile_reports_unterminated_delimiter() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("broken.tmpl");
    fs::write(&input, "ok <%= name").unwrap();

    tmplc()
        .arg("compile")
        .arg(&input)
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unterminated `<%`"));

    assert!(!temp.path().join("out").exists());
}
