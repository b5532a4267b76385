//! HTTP-level tests against a local mock of the GitHub API.

use mockito::Matcher;
use pretty_assertions::assert_eq;
use serde_json::json;

use resk_core::SnippetName;
use resk_github::{GitHubClient, GitHubError};
use resk_sync::{PublishPort, RepoStateStore, StoreError, StoredFile};

const DUMP: &str = ".github/resk.json";

fn client(server: &mockito::Server) -> GitHubClient {
    GitHubClient::with_base_url(server.url(), Some("t0ken".to_string()))
}

// ---------------------------------------------------------------------------
// 1. Gists
// ---------------------------------------------------------------------------

#[test]
fn create_posts_public_single_file_gist() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/gists")
        .match_header("authorization", "Bearer t0ken")
        .match_body(Matcher::Json(json!({
            "public": true,
            "files": { "schema.ts": { "content": "type A = 1\n" } },
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"aa5a","html_url":"https://gist.github.com/aa5a","files":{}}"#)
        .create();

    let remote = client(&server)
        .create(&SnippetName::from("schema.ts"), "type A = 1\n")
        .expect("create");

    mock.assert();
    assert_eq!(remote.id, "aa5a");
    assert_eq!(remote.html_url, "https://gist.github.com/aa5a");
}

#[test]
fn secret_gists_are_not_public() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/gists")
        .match_body(Matcher::PartialJson(json!({ "public": false })))
        .with_status(201)
        .with_body(r#"{"id":"s","html_url":"https://gist.github.com/s"}"#)
        .create();

    client(&server)
        .secret_gists()
        .create(&SnippetName::from("a.ts"), "a")
        .expect("create");
    mock.assert();
}

#[test]
fn update_patches_existing_gist() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PATCH", "/gists/aa5a")
        .match_body(Matcher::Json(json!({
            "files": { "schema.ts": { "content": "type A = 2\n" } },
        })))
        .with_status(200)
        .with_body(r#"{"id":"aa5a","html_url":"https://gist.github.com/aa5a"}"#)
        .create();

    let remote = client(&server)
        .update("aa5a", &SnippetName::from("schema.ts"), "type A = 2\n")
        .expect("update");

    mock.assert();
    assert_eq!(remote.id, "aa5a");
}

#[test]
fn bad_credentials_surface_github_message() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/gists")
        .with_status(401)
        .with_body(r#"{"message":"Bad credentials"}"#)
        .create();

    let err = client(&server)
        .create_gist(&SnippetName::from("a.ts"), "a")
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Bad credentials"), "got: {err}");
}

#[test]
fn garbage_body_is_a_decode_error() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/gists")
        .with_status(201)
        .with_body("<html>")
        .create();

    let err = client(&server)
        .create_gist(&SnippetName::from("a.ts"), "a")
        .unwrap_err();
    assert!(matches!(err, GitHubError::Decode { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Repository contents as dump store
// ---------------------------------------------------------------------------

#[test]
fn read_returns_content_and_sha() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/repos/maticzav/resk/contents/.github/resk.json")
        .match_query(Matcher::UrlEncoded("ref".into(), "master".into()))
        .with_status(200)
        .with_body(r#"{"type":"file","content":"e30=\n","sha":"3d21ec5"}"#)
        .create();

    let gh = client(&server);
    let stored = gh.repo("maticzav", "resk").read(DUMP, "master").expect("read");

    mock.assert();
    assert_eq!(
        stored,
        Some(StoredFile {
            content: "e30=\n".to_string(),
            sha: "3d21ec5".to_string(),
        })
    );
}

#[test]
fn missing_dump_reads_as_absent() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/repos/maticzav/resk/contents/.github/resk.json")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create();

    let gh = client(&server);
    assert_eq!(gh.repo("maticzav", "resk").read(DUMP, "master").expect("read"), None);
}

#[test]
fn forbidden_read_is_a_backend_error() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/repos/maticzav/resk/contents/.github/resk.json")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"message":"Resource not accessible by integration"}"#)
        .create();

    let gh = client(&server);
    let err = gh.repo("maticzav", "resk").read(DUMP, "master").unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)), "got: {err}");
}

#[test]
fn write_sends_sha_branch_and_message() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PUT", "/repos/maticzav/resk/contents/.github/resk.json")
        .match_body(Matcher::Json(json!({
            "message": "Resk action paths update.",
            "content": "e30=",
            "branch": "main",
            "sha": "3d21ec5",
        })))
        .with_status(200)
        .with_body(r#"{"content":{},"commit":{}}"#)
        .create();

    let gh = client(&server);
    gh.repo("maticzav", "resk")
        .write(DUMP, "e30=", Some("3d21ec5"), "Resk action paths update.", "main")
        .expect("write");
    mock.assert();
}

#[test]
fn first_write_omits_sha() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PUT", "/repos/maticzav/resk/contents/.github/resk.json")
        .match_body(Matcher::Json(json!({
            "message": "m",
            "content": "e30=",
            "branch": "master",
        })))
        .with_status(201)
        .with_body("{}")
        .create();

    let gh = client(&server);
    gh.repo("maticzav", "resk")
        .write(DUMP, "e30=", None, "m", "master")
        .expect("write");
    mock.assert();
}

#[test]
fn sha_mismatch_is_a_conflict() {
    let mut server = mockito::Server::new();
    server
        .mock("PUT", "/repos/maticzav/resk/contents/.github/resk.json")
        .with_status(409)
        .with_body(r#"{"message":"resk.json does not match 3d21ec5"}"#)
        .create();

    let gh = client(&server);
    let err = gh
        .repo("maticzav", "resk")
        .write(DUMP, "e30=", Some("3d21ec5"), "m", "master")
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }), "got: {err}");
}

#[test]
fn unknown_branch_is_not_a_conflict() {
    let mut server = mockito::Server::new();
    server
        .mock("PUT", "/repos/maticzav/resk/contents/.github/resk.json")
        .with_status(422)
        .with_body(r#"{"message":"Branch nope not found"}"#)
        .create();

    let gh = client(&server);
    let err = gh
        .repo("maticzav", "resk")
        .write(DUMP, "e30=", None, "m", "nope")
        .unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)), "got: {err}");
    assert!(err.to_string().contains("Branch nope not found"));
}
