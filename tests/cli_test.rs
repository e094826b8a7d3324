use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn setup_file(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    fs::write(&path, contents).expect("write file");
}

fn content2html() -> Command {
    Command::cargo_bin("content2html").expect("binary")
}

#[test]
fn converts_with_default_template_next_to_input() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "template.html", "<title>{{Title}}</title><body>{{{Body}}}</body>");
    setup_file(temp.path(), "posts/hello.content", "<h1>Hello</h1>\n<p>World</p>\n");

    content2html()
        .current_dir(temp.path())
        .arg("posts/hello.content")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello.html"));

    let html = fs::read_to_string(temp.path().join("posts/hello.html")).expect("read output");
    assert!(html.contains("<title>Hello</title>"), "{html}");
}

#[test]
fn out_dir_and_hair_spaces() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "page.hbs", "<title>{{Title}}</title>{{{Body}}}");
    setup_file(temp.path(), "a.content", "<h1>One — two</h1>");

    content2html()
        .current_dir(temp.path())
        .args(["--template", "page.hbs", "--out", "public", "--hair-spaces", "a.content"])
        .assert()
        .success();

    let html = fs::read_to_string(temp.path().join("public/a.html")).expect("read output");
    assert!(html.contains("One\u{200A}—\u{200A}two"), "{html}");
}

#[test]
fn missing_template_exits_with_failure() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "a.content", "<h1>A</h1>");

    content2html()
        .current_dir(temp.path())
        .args(["--template", "nope.html", "a.content"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("nope.html"));

    assert!(!temp.path().join("a.html").exists());
}

#[test]
fn invalid_title_selector_exits_with_failure() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "template.html", "{{{Body}}}");
    setup_file(temp.path(), "a.content", "<h1>A</h1>");

    content2html()
        .current_dir(temp.path())
        .args(["--title-selector", "h1[", "a.content"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid selector"));
}

#[test]
fn file_errors_reported_but_exit_zero() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "template.html", "<title>{{Title}}</title>{{{Body}}}");
    setup_file(temp.path(), "good.content", "<h1>Good</h1>");
    setup_file(temp.path(), "untitled.content", "<p>nothing here</p>");
    setup_file(temp.path(), "same.html", "<h1>Same</h1>");

    content2html()
        .current_dir(temp.path())
        .args(["-q", "untitled.content", "same.html", "missing.content", "good.content"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("error: untitled.content: missing title heading")
                .and(predicate::str::contains("error: same.html: cannot overwrite"))
                .and(predicate::str::contains("error: missing.content:")),
        );

    assert!(temp.path().join("good.html").exists());
    assert!(!temp.path().join("untitled.html").exists());
}

#[test]
fn requires_an_input() {
    content2html().assert().failure().stderr(predicate::str::contains("INPUT"));
}
