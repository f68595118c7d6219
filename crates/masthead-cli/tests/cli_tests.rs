use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color flag for testing
fn masthead_cmd() -> Command {
    let mut cmd = Command::cargo_bin("mh").expect("Failed to find mh binary");
    cmd.arg("--no-color");
    cmd
}

/// Two post documents in seed-file form.
const SEED_POSTS: &str = r#"[
  {
    "id": "post-a",
    "title": "Alpha Post",
    "slug": "alpha-post",
    "excerpt": "The first post.",
    "publishedAt": "2024-06-01T09:00:00Z",
    "createdAt": "2024-05-20T09:00:00Z",
    "author": { "id": "author-1", "name": "Ada" },
    "categories": [{ "id": "cat-news", "title": "News" }]
  },
  {
    "id": "post-b",
    "title": "Beta Post",
    "slug": "beta-post",
    "createdAt": "2024-06-10T09:00:00Z"
  }
]"#;

#[test]
fn test_cli_help() {
    masthead_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("post-listing"))
        .stdout(predicate::str::contains("seed"));
}

#[test]
fn test_cli_list_empty_store() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    masthead_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No posts found."));
}

#[test]
fn test_cli_seed_and_list() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    let seed_path = temp_dir.path().join("posts.json");
    std::fs::write(&seed_path, SEED_POSTS).expect("Failed to write seed file");

    masthead_cmd()
        .args(["--database-file", db_arg, "seed", seed_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 posts"));

    masthead_cmd()
        .args(["--database-file", db_arg, "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alpha Post"))
        .stdout(predicate::str::contains("Beta Post"))
        .stdout(predicate::str::contains("By Ada"));
}

#[test]
fn test_cli_default_command_lists() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    masthead_cmd()
        .args(["--database-file", db_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No posts found."));
}

#[test]
fn test_cli_list_with_paginated_config() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    let seed_path = temp_dir.path().join("posts.json");
    std::fs::write(&seed_path, SEED_POSTS).expect("Failed to write seed file");

    let config_path = temp_dir.path().join("listing.json");
    std::fs::write(
        &config_path,
        r#"{ "orderBy": "AtoZ", "paginationMode": "pagination", "pageSize": 1 }"#,
    )
    .expect("Failed to write config file");

    masthead_cmd()
        .args(["--database-file", db_arg, "seed", seed_path.to_str().unwrap()])
        .assert()
        .success();

    masthead_cmd()
        .args([
            "--database-file",
            db_arg,
            "list",
            "--config",
            config_path.to_str().unwrap(),
            "--page",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Beta Post"))
        .stdout(predicate::str::contains("Page 2 of 2"))
        .stdout(predicate::str::contains("Alpha Post").not());
}

#[test]
fn test_cli_malformed_config_still_lists() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    let seed_path = temp_dir.path().join("posts.json");
    std::fs::write(&seed_path, SEED_POSTS).expect("Failed to write seed file");

    // Out-of-domain enum values and page size normalize to defaults.
    let config_path = temp_dir.path().join("listing.json");
    std::fs::write(
        &config_path,
        r#"{ "orderBy": "shuffled", "paginationMode": "infinite", "pageSize": -3 }"#,
    )
    .expect("Failed to write config file");

    masthead_cmd()
        .args(["--database-file", db_arg, "seed", seed_path.to_str().unwrap()])
        .assert()
        .success();

    masthead_cmd()
        .args([
            "--database-file",
            db_arg,
            "list",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alpha Post"))
        .stdout(predicate::str::contains("Beta Post"));
}

#[test]
fn test_cli_schema_output() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    masthead_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("displaySelector"))
        .stdout(predicate::str::contains("paginationMode"));
}
