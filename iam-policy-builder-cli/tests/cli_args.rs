use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn catalogs() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../iam-policy-builder-services/resources/services")
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("iam-policy-builder").unwrap();
    cmd.env_remove("IAM_POLICY_BUILDER_SERVICE").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_generate_requires_input_and_output() {
    cli()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn test_generate_writes_modules_and_index() {
    let out = TempDir::new().unwrap();

    cli()
        .args(["generate", "--input"])
        .arg(catalogs())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ok    widgets -> widgets.rs"))
        .stdout(predicate::str::contains(
            "3 service(s): 3 generated, 0 failed, 0 collision warning(s)",
        ));

    for file in ["groundstation.rs", "s3.rs", "widgets.rs", "mod.rs"] {
        assert!(out.path().join(file).is_file(), "{file} missing");
    }
    let index = fs::read_to_string(out.path().join("mod.rs")).unwrap();
    assert!(index.contains("pub mod widgets;"));
    assert!(index.contains("pub use widgets::Widgets;"));
}

#[test]
fn test_check_after_generate_passes() {
    let out = TempDir::new().unwrap();
    let generate = |check: bool| {
        let mut cmd = cli();
        cmd.args(["generate", "-i"])
            .arg(catalogs())
            .arg("-o")
            .arg(out.path());
        if check {
            cmd.arg("--check");
        }
        cmd
    };

    generate(false).assert().success();
    generate(true)
        .assert()
        .success()
        .stdout(predicate::str::contains("stale").not());
}

#[test]
fn test_check_reports_stale_files() {
    let out = TempDir::new().unwrap();
    fs::write(out.path().join("widgets.rs"), "// edited by hand\n").unwrap();

    cli()
        .args(["generate", "--check", "--input"])
        .arg(catalogs())
        .arg("--output")
        .arg(out.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("widgets.rs (outdated)"))
        .stdout(predicate::str::contains("s3.rs (missing)"));

    // Nothing is written in check mode.
    assert!(!out.path().join("s3.rs").exists());
}

#[test]
fn test_single_service_skips_index() {
    let out = TempDir::new().unwrap();

    cli()
        .args(["generate", "--service", "s3", "--input"])
        .arg(catalogs())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 service(s): 1 generated"));

    assert!(out.path().join("s3.rs").is_file());
    assert!(!out.path().join("widgets.rs").exists());
    assert!(!out.path().join("mod.rs").exists());
}

#[test]
fn test_service_from_environment() {
    let out = TempDir::new().unwrap();

    cli()
        .env("IAM_POLICY_BUILDER_SERVICE", "widgets")
        .args(["generate", "--input"])
        .arg(catalogs())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success();

    assert!(out.path().join("widgets.rs").is_file());
    assert!(!out.path().join("s3.rs").exists());
}

#[test]
fn test_unknown_service_is_an_error() {
    let out = TempDir::new().unwrap();

    cli()
        .args(["generate", "--service", "nope", "--input"])
        .arg(catalogs())
        .arg("--output")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no catalog named `nope.json`"));
}

#[test]
fn test_broken_catalog_fails_without_blocking_others() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::copy(
        catalogs().join("widgets.json"),
        input.path().join("widgets.json"),
    )
    .unwrap();
    fs::write(input.path().join("broken.json"), "{ not json").unwrap();

    cli()
        .args(["generate", "--input"])
        .arg(input.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAIL  broken:"))
        .stdout(predicate::str::contains("ok    widgets -> widgets.rs"));

    assert!(out.path().join("widgets.rs").is_file());
    assert!(!out.path().join("broken.rs").exists());
}

#[test]
fn test_missing_input_dir() {
    let dir = TempDir::new().unwrap();

    cli()
        .args(["generate", "--input"])
        .arg(dir.path().join("absent"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: failed to load catalogs"));
}

#[test]
fn test_inspect_prints_normalized_metadata() {
    cli()
        .arg("inspect")
        .arg(catalogs().join("widgets.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""prefix": "widgets""#))
        .stdout(predicate::str::contains("MakeWidget"))
        .stdout(predicate::str::contains("module_name").not());
}

#[test]
fn test_inspect_with_plan() {
    cli()
        .args(["inspect", "--plan"])
        .arg(catalogs().join("widgets.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""module_name": "widgets""#))
        .stdout(predicate::str::contains(r#""method": "to_make_widget""#));
}

#[test]
fn test_inspect_rejects_invalid_catalog() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "[]").unwrap();

    cli()
        .arg("inspect")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: "));
}
