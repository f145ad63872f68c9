//! End-to-end tests for the `pacbuilder` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn pacbuilder(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pacbuilder").unwrap();
    cmd.current_dir(dir)
        .env_remove("PACBUILDER_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn workspace(allow_list: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("allow-list.txt"), allow_list).unwrap();
    dir
}

#[test]
fn test_default_build_offline() {
    let dir = workspace("# corp apps\nExample.COM\n-bad.com\ngood.org\ngood.org\n");

    pacbuilder(dir.path())
        .args(["--skip-dedup", "--skip-validation"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded 2 domain(s)"))
        .stderr(predicate::str::contains("skipping invalid domain on line 3"))
        .stderr(predicate::str::contains("Generated proxy.pac with 2 domain(s)"));

    let pac = std::fs::read_to_string(dir.path().join("proxy.pac")).unwrap();
    assert!(pac.contains("\"example.com\",\n        \"good.org\"\n"));
    assert!(pac.contains("return \"PROXY 127.0.0.1:1\";"));
}

#[test]
fn test_build_subcommand_with_paths_and_proxy() {
    let dir = workspace("a.com\n");

    pacbuilder(dir.path())
        .args([
            "build",
            "--skip-dedup",
            "--allow-list",
            "allow-list.txt",
            "--output",
            "dr.pac",
            "--proxy",
            "10.0.0.1:3128",
        ])
        .assert()
        .success();

    let pac = std::fs::read_to_string(dir.path().join("dr.pac")).unwrap();
    assert!(pac.contains("\"PROXY 10.0.0.1:3128\""));
}

#[test]
fn test_flags_before_build_subcommand_apply() {
    let dir = workspace("a.com\n");

    pacbuilder(dir.path())
        .args(["--skip-dedup", "--skip-validation", "--output", "early.pac", "build"])
        .assert()
        .success();

    assert!(dir.path().join("early.pac").exists());
    assert!(!dir.path().join("proxy.pac").exists());
}

#[test]
fn test_flags_before_other_subcommand_fail() {
    let dir = tempfile::tempdir().unwrap();

    pacbuilder(dir.path())
        .args(["--skip-dedup", "check", "a.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("build options"));
}

#[test]
fn test_missing_allow_list_fails() {
    let dir = tempfile::tempdir().unwrap();

    pacbuilder(dir.path())
        .args(["--skip-dedup", "--skip-validation"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("allow-list.txt"));

    assert!(!dir.path().join("proxy.pac").exists());
}

#[test]
fn test_allow_list_without_valid_domains_fails() {
    let dir = workspace("# nothing here\n-bad.com\n");

    pacbuilder(dir.path())
        .args(["--skip-dedup", "--skip-validation"])
        .assert()
        .failure();

    assert!(!dir.path().join("proxy.pac").exists());
}

#[test]
fn test_dedup_against_remote_list() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/drdb.txt")
        .with_status(200)
        .with_body("# pre-selected\n*.b.com\nd.com\n")
        .create();

    let dir = workspace("a.com\nb.com\nc.com\n");
    pacbuilder(dir.path())
        .args(["--skip-validation", "--exclusion-url"])
        .arg(format!("{}/drdb.txt", server.url()))
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed 1 domain(s)"))
        .stderr(predicate::str::contains("b.com"));

    mock.assert();
    let pac = std::fs::read_to_string(dir.path().join("proxy.pac")).unwrap();
    assert!(pac.contains("\"a.com\",\n        \"c.com\"\n"));
    assert!(!pac.contains("\"b.com\""));
}

#[test]
fn test_everything_removed_fails() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/drdb.txt")
        .with_status(200)
        .with_body("a.com\n")
        .create();

    let dir = workspace("a.com\n");
    pacbuilder(dir.path())
        .args(["--skip-validation", "--exclusion-url"])
        .arg(format!("{}/drdb.txt", server.url()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing left to publish"));

    assert!(!dir.path().join("proxy.pac").exists());
}

#[test]
fn test_config_file_is_used_and_flags_override() {
    let dir = workspace("a.com\n");
    std::fs::write(
        dir.path().join("pacbuilder.toml"),
        "[paths]\noutput = \"from-config.pac\"\n\n[render]\nproxy = \"192.0.2.1:80\"\n\n\
         [exclusions]\nenabled = false\n\n[validation]\nenabled = false\n",
    )
    .unwrap();

    pacbuilder(dir.path()).assert().success();
    let pac = std::fs::read_to_string(dir.path().join("from-config.pac")).unwrap();
    assert!(pac.contains("\"PROXY 192.0.2.1:80\""));

    pacbuilder(dir.path())
        .args(["--proxy", "192.0.2.2:81"])
        .assert()
        .success();
    let pac = std::fs::read_to_string(dir.path().join("from-config.pac")).unwrap();
    assert!(pac.contains("\"PROXY 192.0.2.2:81\""));
}

#[test]
fn test_invalid_config_value_fails() {
    let dir = workspace("a.com\n");

    pacbuilder(dir.path())
        .args(["--skip-dedup", "--skip-validation", "--proxy", "bad proxy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("render.proxy"));
}

#[test]
fn test_validate_command() {
    let dir = workspace("a.com\n");
    pacbuilder(dir.path())
        .args(["--skip-dedup", "--skip-validation"])
        .assert()
        .success();

    pacbuilder(dir.path())
        .args(["validate", "--structural-only", "proxy.pac"])
        .assert()
        .success()
        .stdout(predicate::str::contains("proxy.pac is valid"));

    std::fs::write(dir.path().join("broken.pac"), "var x = 1;\n").unwrap();
    pacbuilder(dir.path())
        .args(["validate", "--structural-only", "broken.pac"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing FindProxyForURL function"));
}

#[test]
fn test_check_command() {
    let dir = tempfile::tempdir().unwrap();

    pacbuilder(dir.path())
        .args(["check", "Example.COM"])
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com"));

    pacbuilder(dir.path())
        .args(["check", "--", "-bad.com"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid domain"));

    pacbuilder(dir.path())
        .args(["check", "bad,domain.com"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("comma"));
}

#[test]
fn test_config_generate_then_validate() {
    let dir = tempfile::tempdir().unwrap();

    pacbuilder(dir.path())
        .args(["config", "generate"])
        .assert()
        .success();
    assert!(dir.path().join("pacbuilder.toml").exists());

    pacbuilder(dir.path())
        .args(["config", "generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    pacbuilder(dir.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_show_prints_toml() {
    let dir = tempfile::tempdir().unwrap();

    pacbuilder(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[paths]"))
        .stdout(predicate::str::contains("drdb.txt"));
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();

    pacbuilder(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pacbuilder"));
}
