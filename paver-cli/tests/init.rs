use predicates::prelude::*;

mod common;

#[test]
fn test_init_requires_dirs() {
    common::paver()
        .args(["init", "--priv-pass", "private1"])
        .assert()
        .failure();
}

#[test]
fn test_init_rejects_duplicate_dirs() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dir = tmp.path().join("plots").display().to_string();

    common::paver()
        .args([
            "init",
            "--priv-pass",
            "private1",
            "--dirs",
            &format!("{dir},{dir}"),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate plot directory at index 1"));
}

#[test]
fn test_init_rejects_count_list_mismatch() {
    let tmp = tempfile::TempDir::new().unwrap();
    let a = tmp.path().join("a").display().to_string();
    let b = tmp.path().join("b").display().to_string();
    let c = tmp.path().join("c").display().to_string();

    common::paver()
        .args([
            "init",
            "--priv-pass",
            "private1",
            "--dirs",
            &format!("{a},{b},{c}"),
            "--counts",
            "1,2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must have 3 entries, got 2"));
}

#[test]
fn test_init_rejects_non_numeric_count() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dir = tmp.path().join("plots").display().to_string();

    common::paver()
        .args([
            "init",
            "--priv-pass",
            "private1",
            "--dirs",
            &dir,
            "--counts",
            "many",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid plot count at index 0"));
}

#[test]
fn test_init_rejects_non_empty_dir_and_removes_created_ones() {
    let tmp = tempfile::TempDir::new().unwrap();
    let stale = tmp.path().join("stale");
    std::fs::create_dir(&stale).unwrap();
    std::fs::write(stale.join("old.plot"), b"x").unwrap();
    let fresh = tmp.path().join("fresh");

    common::paver()
        .args([
            "init",
            "--priv-pass",
            "private1",
            "--dirs",
            &format!("{},{}", stale.display(), fresh.display()),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be empty"));

    assert!(stale.join("old.plot").is_file());
    assert!(!fresh.exists(), "directory created by the failed run must be removed");
}
