//! End-to-end tests that exercise the `meshc` binary as a subprocess,
//! the same way a user invokes it from a shell.

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

fn mesh_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("should create a temp file");
    write!(file, "{contents}").expect("should write source");
    file
}

fn meshc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_meshc"))
}

#[test]
fn check_exits_zero_on_a_clean_file() {
    let file = mesh_file("def add(a: int, b: int) -> int:\n    return a + b\nadd(1, 2)\n");
    let output = meshc().arg("check").arg(file.path()).output().expect("should run meshc");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stderr.is_empty());
}

#[test]
fn check_exits_nonzero_and_prints_one_report_on_a_type_error() {
    let file = mesh_file("print(missing)\n");
    let output = meshc().arg("check").arg(file.path()).output().expect("should run meshc");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("undefined name"));
}

#[test]
fn check_reports_a_syntax_error_without_panicking() {
    let file = mesh_file("if x\n    pass\n");
    let output = meshc().arg("check").arg(file.path()).output().expect("should run meshc");
    assert!(!output.status.success());
}

#[test]
fn dump_tokens_prints_a_token_per_line() {
    let file = mesh_file("x = 1\n");
    let output = meshc().arg("dump-tokens").arg(file.path()).output().expect("should run meshc");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().count() >= 3);
}

#[test]
fn dump_ast_prints_the_parsed_module() {
    let file = mesh_file("x = 1\n");
    let output = meshc().arg("dump-ast").arg(file.path()).output().expect("should run meshc");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Assign"));
}

#[test]
fn gen_tables_builds_a_table_from_a_text_grammar() {
    let grammar = "@start: IDENTIFIER\n";
    let mut file = NamedTempFile::new().expect("should create a temp file");
    write!(file, "{grammar}").expect("should write grammar");
    let output = meshc().arg("gen-tables").arg(file.path()).output().expect("should run meshc");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("state"));
}

#[test]
fn gen_tables_reports_an_invalid_grammar_file_without_panicking() {
    let grammar = "start: IDENTIFIER\n";
    let mut file = NamedTempFile::new().expect("should create a temp file");
    write!(file, "{grammar}").expect("should write grammar");
    let output = meshc().arg("gen-tables").arg(file.path()).output().expect("should run meshc");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("entry"));
}
