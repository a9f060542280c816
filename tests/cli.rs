// tests/cli.rs
// =============================================================================
// End-to-end tests for the github-data-fetch binary.
//
// A local mockito server stands in for the GitHub API, so these run offline.
// =============================================================================

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use tempfile::TempDir;

fn fetch_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("github-data-fetch");
    cmd.env_remove("GITHUB_TOKEN").env_remove("GITHUB_API_URL");
    cmd
}

const ISSUES: &str = r#"[
  {"id": 101, "number": 1, "title": "Bug", "state": "open",
   "created_at": "2022-01-01T00:00:00Z", "updated_at": "2022-01-01T00:00:00Z"},
  {"id": 102, "number": 2, "title": "Fix bug", "state": "closed",
   "created_at": "2022-01-02T00:00:00Z", "updated_at": "2022-01-03T00:00:00Z",
   "pull_request": {"url": "https://api.github.com/repos/octo/demo/pulls/2"}}
]"#;

const PULL: &str = r#"{
  "id": 202, "number": 2, "state": "closed", "title": "Fix bug",
  "created_at": "2022-01-02T00:00:00Z", "updated_at": "2022-01-03T00:00:00Z",
  "merged_at": "2022-01-03T00:00:00Z", "merged": true,
  "head": {"label": "octo:fix", "ref": "fix", "sha": "111"},
  "base": {"label": "octo:main", "ref": "main", "sha": "222"}
}"#;

// =============================================================================
// Usage
// =============================================================================

#[test]
fn help_lists_required_flags() {
    fetch_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--owner"))
        .stdout(predicate::str::contains("--repository"))
        .stdout(predicate::str::contains("--token"))
        .stdout(predicate::str::contains("--output-directory"));
}

#[test]
fn missing_token_is_usage_error() {
    fetch_cmd()
        .args(["-O", "octo", "-r", "demo", "-o", "out"])
        .assert()
        .code(2);
}

#[test]
fn invalid_owner_fails() {
    let out = TempDir::new().unwrap();
    fetch_cmd()
        .args(["-O", "octo/demo", "-r", "demo", "-t", "secret", "-o"])
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid arguments"));
}

// =============================================================================
// Fetching
// =============================================================================

#[test]
fn fetches_issues_and_pulls() {
    let mut server = Server::new();
    let issues = server
        .mock("GET", "/repos/octo/demo/issues")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .match_header("authorization", "Bearer secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ISSUES)
        .create();
    let pull = server
        .mock("GET", "/repos/octo/demo/pulls/2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PULL)
        .create();

    let out = TempDir::new().unwrap();
    fetch_cmd()
        .args(["-O", "octo", "-r", "demo", "-t", "secret", "-f", "json"])
        .args(["--api-url", server.url().as_str(), "--max-retries", "0", "-o"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Issues: 1"))
        .stdout(predicate::str::contains("Pulls: 1"));

    issues.assert();
    pull.assert();

    let dir = out.path().join("octo").join("demo");
    let issues: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("issues.json")).unwrap()).unwrap();
    assert_eq!(issues.as_array().unwrap().len(), 1);
    assert_eq!(issues[0]["title"], "Bug");

    let pulls: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("pulls.json")).unwrap()).unwrap();
    assert_eq!(pulls[0]["number"], 2);
    assert_eq!(pulls[0]["head"]["ref"], "fix");
}

#[test]
fn issues_only_writes_msgpack_and_skips_pulls() {
    let mut server = Server::new();
    server
        .mock("GET", "/repos/octo/demo/issues")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ISSUES)
        .create();
    let pull = server
        .mock("GET", "/repos/octo/demo/pulls/2")
        .expect(0)
        .create();

    let out = TempDir::new().unwrap();
    fetch_cmd()
        .args(["-O", "octo", "-r", "demo", "-t", "secret", "--issues-only"])
        .args(["--api-url", server.url().as_str(), "--max-retries", "0", "-o"])
        .arg(out.path())
        .assert()
        .success();

    pull.assert();
    let dir = out.path().join("octo").join("demo");
    assert!(dir.join("issues.msgpack").exists());
    assert!(!dir.join("pulls.msgpack").exists());
}

#[test]
fn bad_credentials_exit_with_error() {
    let mut server = Server::new();
    server
        .mock("GET", "/repos/octo/demo/issues")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message": "Bad credentials"}"#)
        .create();

    let out = TempDir::new().unwrap();
    fetch_cmd()
        .args(["-O", "octo", "-r", "demo", "-t", "wrong"])
        .args(["--api-url", server.url().as_str(), "--max-retries", "0", "-o"])
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unauthorized"));
}
