//! End-to-end tests for the `wlancaf-merge check` command.
//!
//! These tests verify the CLI behavior of the `check` command by invoking
//! the binary directly against temporary kernel trees.

#[allow(dead_code)]
mod common;
use common::prelude::*;

#[test]
fn test_check_help() {
    let mut cmd = cargo_bin_cmd!("wlancaf-merge");
    cmd.arg("check")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--wlan"))
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--root"));
}

#[test]
fn test_check_initial_on_fresh_tree() {
    let tree = KernelTree::new();
    tree.command()
        .args(["check", "-W", "qcacld", "-I", "initial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[FAIL]").not())
        .stdout(predicate::str::contains("[OK] fw-api does not exist"))
        .stdout(predicate::str::contains("qcacld initial can run"));
}

#[test]
fn test_check_update_on_imported_tree() {
    let tree = KernelTree::new().with_populated("prima");
    tree.command()
        .args(["check", "--wlan", "prima", "--mode", "update"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prima exists and is not empty"));
}

#[test]
fn test_check_reports_partial_import() {
    let tree = KernelTree::new()
        .with_populated("fw-api")
        .with_empty("qca-wifi-host-cmn");
    tree.command()
        .args(["check", "-W", "qcacld", "--init", "update"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[OK] fw-api"))
        .stdout(predicate::str::contains("[FAIL] qca-wifi-host-cmn exists but is empty"))
        .stdout(predicate::str::contains("[FAIL] qcacld-3.0 does not exist"))
        .stderr(predicate::str::contains("Precondition mismatch"))
        .stderr(predicate::str::contains("--mode initial"));
}

#[test]
fn test_check_outside_kernel_tree() {
    let tree = KernelTree::bare();
    tree.command()
        .args(["check", "-W", "prima", "-I", "initial"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Environment error"))
        .stderr(predicate::str::contains("--root"));
}

#[test]
fn test_check_with_root_flag() {
    let tree = KernelTree::new().with_populated("prima");
    let elsewhere = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("wlancaf-merge");
    cmd.current_dir(elsewhere.path())
        .env("NO_COLOR", "1")
        .args(["check", "-W", "prima", "-I", "initial", "--root"])
        .arg(tree.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[FAIL] prima exists and is not empty"));
}

#[test]
fn test_check_does_not_modify_tree() {
    let tree = KernelTree::new();
    tree.command()
        .args(["check", "-W", "prima", "-I", "initial"])
        .assert()
        .success();

    tree.child("drivers/staging/Kconfig")
        .assert(fixtures::STAGING_KCONFIG);
    tree.child("drivers/staging/prima")
        .assert(predicate::path::missing());
}
