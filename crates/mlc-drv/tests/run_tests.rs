//! End-to-end interpretation tests driving `mlc -r`.

use assert_cmd::Command;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn mlc() -> Command {
    Command::cargo_bin("mlc").expect("mlc binary should build")
}

/// Writes `source` to a temp file and returns it (kept alive by the
/// caller so the path stays valid).
fn source_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(source.as_bytes()).expect("write source");
    file
}

#[test]
fn test_hello_world() {
    mlc()
        .arg(fixtures_dir().join("hello.mini"))
        .arg("-r")
        .assert()
        .success()
        .stdout("Hello, World!\n");
}

#[test]
fn test_factorial() {
    mlc()
        .arg(fixtures_dir().join("factorial.mini"))
        .arg("-r")
        .assert()
        .success()
        .stdout("Fatorial de 5:\n120\n");
}

#[test]
fn test_fibonacci() {
    mlc()
        .arg(fixtures_dir().join("fibonacci.mini"))
        .arg("-r")
        .assert()
        .success()
        .stdout("0\n1\n1\n2\n3\n5\n8\n13\n21\n34\n");
}

#[test]
fn test_arrays() {
    mlc()
        .arg(fixtures_dir().join("arrays.mini"))
        .arg("-r")
        .assert()
        .success()
        .stdout("1\n3\n10\n");
}

#[test]
fn test_function_shadowing() {
    mlc()
        .arg(fixtures_dir().join("shadowing.mini"))
        .arg("-r")
        .assert()
        .success()
        .stdout("20\n10\n");
}

#[test]
fn test_short_circuit_skips_side_effects() {
    let file = source_file(
        "function noisy(): bool {\n\
         \x20   print(\"evaluated\");\n\
         \x20   return true;\n\
         }\n\
         if (false and noisy()) {\n\
         \x20   print(\"then\");\n\
         }\n\
         if (true or noisy()) {\n\
         \x20   print(\"taken\");\n\
         }\n",
    );
    mlc()
        .arg(file.path())
        .arg("-r")
        .assert()
        .success()
        .stdout("taken\n");
}

#[test]
fn test_input_round_trip() {
    let file = source_file(
        "string name = input(\"name? \");\n\
         print(\"hello \" + name);\n",
    );
    mlc()
        .arg(file.path())
        .arg("-r")
        .write_stdin("world\n")
        .assert()
        .success()
        .stdout("name? hello world\n");
}

#[test]
fn test_float_output_formatting() {
    let file = source_file(
        "float x = 1;\n\
         print(x);\n\
         print(2.5 * 2);\n\
         print(1 / 2);\n\
         print(1.0 / 2.0);\n",
    );
    mlc()
        .arg(file.path())
        .arg("-r")
        .assert()
        .success()
        .stdout("1.0\n5.0\n0\n0.5\n");
}

#[test]
fn test_function_declaration_order_is_irrelevant() {
    let forward = source_file(
        "print(double(21));\n\
         function double(int n): int { return n * 2; }\n",
    );
    let backward = source_file(
        "function double(int n): int { return n * 2; }\n\
         print(double(21));\n",
    );

    mlc()
        .arg(forward.path())
        .arg("-r")
        .assert()
        .success()
        .stdout("42\n");
    mlc()
        .arg(backward.path())
        .arg("-r")
        .assert()
        .success()
        .stdout("42\n");
}
