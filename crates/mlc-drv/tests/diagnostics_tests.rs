//! Diagnostic format tests: every phase's errors render in the stable
//! one-line format and fail with a non-zero exit status.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn mlc() -> Command {
    Command::cargo_bin("mlc").expect("mlc binary should build")
}

fn source_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(source.as_bytes()).expect("write source");
    file
}

#[test]
fn test_lexical_error() {
    let file = source_file("int x = 1;\nint y = @;\n");
    mlc()
        .arg(file.path())
        .assert()
        .code(1)
        .stderr("Lexical error at line 2, column 9: unexpected character '@'\n");
}

#[test]
fn test_unterminated_string() {
    let file = source_file("print(\"oops);\n");
    mlc()
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unterminated string literal"));
}

#[test]
fn test_missing_semicolon() {
    let file = source_file("int x = 1\nprint(x);\n");
    mlc()
        .arg(file.path())
        .assert()
        .code(1)
        .stderr("Syntactic error at line 2, column 1: expected ';', found 'print'\n");
}

#[test]
fn test_invalid_assignment_target() {
    let file = source_file("1 = 2;\n");
    mlc()
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Syntactic error at line 1, column 3: invalid assignment target",
        ));
}

#[test]
fn test_undeclared_name() {
    let file = source_file("int x = 1;\nprint(y);\n");
    mlc()
        .arg(file.path())
        .assert()
        .code(1)
        .stderr("Semantic error at line 2, column 7: undeclared name 'y'\n");
}

#[test]
fn test_semantic_errors_batch() {
    // Two unrelated semantic errors arrive in one run, in source order.
    let file = source_file("int a = \"text\";\nbool b = 1 and true;\n");
    mlc()
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line 1").and(predicate::str::contains("line 2")));
}

#[test]
fn test_index_out_of_bounds_at_runtime() {
    let file = source_file("int[3] a = [1, 2, 3];\nprint(a[5]);\n");
    mlc()
        .arg(file.path())
        .arg("-r")
        .assert()
        .code(1)
        .stderr("Runtime error at line 2, column 7: index 5 out of bounds for array of length 3\n");
}

#[test]
fn test_division_by_zero_at_runtime() {
    let file = source_file("int z = 0;\nprint(10 / z);\n");
    mlc()
        .arg(file.path())
        .arg("-r")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Runtime error at line 2").and(
            predicate::str::contains("division by zero"),
        ));
}

#[test]
fn test_runtime_output_before_error_is_kept() {
    let file = source_file("print(\"first\");\nint z = 0;\nprint(1 / z);\n");
    mlc()
        .arg(file.path())
        .arg("-r")
        .assert()
        .code(1)
        .stdout("first\n")
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn test_semantic_error_blocks_interpretation() {
    let file = source_file("print(undeclared);\nprint(\"should not run\");\n");
    mlc()
        .arg(file.path())
        .arg("-r")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_return_path() {
    let file = source_file("function f(int n): int {\n    if (n > 0) {\n        return 1;\n    }\n}\n");
    mlc()
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "does not return a value on every path",
        ));
}
