//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn rulecraft(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("rulecraft").unwrap();
    cmd.current_dir(dir).arg("--no-color");
    cmd
}

#[test]
fn test_help() {
    let dir = tempdir().unwrap();
    rulecraft(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("translate"))
        .stdout(predicate::str::contains("learn"));
}

#[test]
fn test_rules_bootstraps_database() {
    let dir = tempdir().unwrap();
    let rules_path = dir.path().join("rule-set.json");

    rulecraft(dir.path())
        .args(["--rules", rules_path.to_str().unwrap(), "rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rules (1)"))
        .stdout(predicate::str::contains("ALLOCATION"))
        .stdout(predicate::str::contains("type name = value;"));

    assert!(rules_path.exists());
}

#[test]
fn test_rules_json() {
    let dir = tempdir().unwrap();

    rulecraft(dir.path())
        .args(["rules", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"PYTHON\""))
        .stdout(predicate::str::contains("\"template\": \"name = value\""));
}

#[test]
fn test_add_and_match() {
    let dir = tempdir().unwrap();

    rulecraft(dir.path())
        .args([
            "add",
            "--name",
            "ADDITION",
            "--python",
            "c = a + b",
            "--java",
            "int c = a + b;",
            "--cpp",
            "int c = a + b;",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ADDITION"));

    rulecraft(dir.path())
        .args(["match", "int total = x + y;", "--language", "java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ADDITION"))
        .stdout(predicate::str::contains("score 100"));
}

#[test]
fn test_add_duplicate_fails() {
    let dir = tempdir().unwrap();

    rulecraft(dir.path())
        .args([
            "add",
            "--name",
            "ALLOCATION",
            "--python",
            "b = 1",
            "--java",
            "int b = 1;",
            "--cpp",
            "int b = 1;",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_translate_file() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("alloc.py"), "x = 12\n\nwidth = 640\ny = 3.5\n").unwrap();

    rulecraft(dir.path())
        .args(["translate", "alloc.py", "--output-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 of 3 lines translated"));

    let java = std::fs::read_to_string(dir.path().join("out").join("translations.java")).unwrap();
    assert_eq!(java, "int x = 12;\nint width = 640;\nfloat y = 3.5;\n");
    let cpp = std::fs::read_to_string(dir.path().join("out").join("translations.cpp")).unwrap();
    assert_eq!(cpp, "int x = 12;\nint width = 640;\nfloat y = 3.5;\n");
}

#[test]
fn test_translate_evaluate_appends_log() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("alloc.py"), "x = 12\nwidth = 640\n").unwrap();
    std::fs::write(dir.path().join("alloc.java"), "int x = 12;\nint width = 641;\n").unwrap();
    std::fs::write(
        dir.path().join(".rulecraft.yaml"),
        "evaluation:\n  log_path: logs/eval.txt\n",
    )
    .unwrap();

    rulecraft(dir.path())
        .args(["translate", "alloc.py", "--to", "java", "--output-dir", "out", "--evaluate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50.00%"));

    let log = std::fs::read_to_string(dir.path().join("logs").join("eval.txt")).unwrap();
    assert!(log.contains("Precision: 50.00"));
    assert!(!dir.path().join("out").join("translations.cpp").exists());
}

#[test]
fn test_translate_to_source_language_fails() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("alloc.py"), "x = 12\n").unwrap();

    rulecraft(dir.path())
        .args(["translate", "alloc.py", "--to", "python"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("same as the source language"));
}

#[test]
fn test_unsupported_language_rejected() {
    let dir = tempdir().unwrap();

    rulecraft(dir.path())
        .args(["match", "x = 1", "--language", "rust"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported language"));
}

#[test]
fn test_eval() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("truth.java"), "int a = 1;\n\nint b = 2;\nint c = 3;\n").unwrap();
    std::fs::write(dir.path().join("out.java"), "int a = 1;\nint b = 2;\nint c = 4;\n").unwrap();

    rulecraft(dir.path())
        .args(["eval", "truth.java", "out.java", "--no-log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("66.67%"));
}

#[test]
fn test_repl_session() {
    let dir = tempdir().unwrap();

    rulecraft(dir.path())
        .arg("repl")
        .write_stdin("x = 12\nrust\npython\nwhile True: pass\npy\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("JAVA: int x = 12;"))
        .stdout(predicate::str::contains("No appropriate rule for translating 'while True: pass'"))
        .stderr(predicate::str::contains("Unsupported language: rust"));

    assert!(dir.path().join("rule-set.json").exists());
}
