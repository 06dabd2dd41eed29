//! CLI integration tests. Network commands run against a mock index.

#![allow(deprecated)] // Command::cargo_bin deprecated for custom build-dir; still works for default

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command with preferences and the config file kept under `dir`.
fn bookvibe(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("bookvibe").unwrap();
    cmd.env("BOOKVIBE_DATA_DIR", dir);
    cmd.env("BOOKVIBE_CONFIG", dir.join("config.toml"));
    cmd.env_remove("BOOKVIBE_API_URL");
    cmd
}

fn page_body() -> serde_json::Value {
    serde_json::json!({
        "count": 2,
        "next": null,
        "previous": null,
        "results": [
            {"id": 1, "title": "Low", "authors": [], "languages": ["en"], "formats": {}, "download_count": 5},
            {"id": 2, "title": "High", "authors": [], "languages": ["de"], "formats": {}, "download_count": 20}
        ]
    })
}

#[test]
fn help_prints_and_exits_success() {
    Command::cargo_bin("bookvibe")
        .unwrap()
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn config_show_json_valid() {
    let dir = tempfile::tempdir().unwrap();
    let out = bookvibe(dir.path())
        .args(["config", "show", "--json"])
        .assert()
        .success();
    let stdout = std::str::from_utf8(&out.get_output().stdout).unwrap();
    let v: serde_json::Value = serde_json::from_str(stdout).expect("config show --json should output valid JSON");
    assert_eq!(v["storage"]["data_dir"], dir.path().to_str().unwrap());
}

#[test]
fn config_set_writes_override_path() {
    let dir = tempfile::tempdir().unwrap();
    bookvibe(dir.path())
        .args(["config", "set", "api.timeout_ms", "2500"])
        .assert()
        .success();
    let written = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("timeout_ms = 2500"));

    let out = bookvibe(dir.path())
        .args(["config", "show", "--json"])
        .assert()
        .success();
    let v: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(v["api"]["timeout_ms"], 2500);
}

#[test]
fn config_set_refuses_to_overwrite_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api\nbase_url = ").unwrap();

    let out = bookvibe(dir.path())
        .args(["config", "set", "api.timeout_ms", "2500"])
        .assert()
        .failure();
    let stderr = std::str::from_utf8(&out.get_output().stderr).unwrap();
    assert!(stderr.contains("Invalid config"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[api\nbase_url = ");
}

#[test]
fn settings_set_then_show() {
    let dir = tempfile::tempdir().unwrap();
    bookvibe(dir.path())
        .args(["settings", "set", "theme", "dark"])
        .assert()
        .success();
    let out = bookvibe(dir.path())
        .args(["settings", "show", "--json"])
        .assert()
        .success();
    let v: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(v["theme"], "dark");
    assert_eq!(v["fontSize"], 16);
}

#[test]
fn settings_set_rejects_bad_value() {
    let dir = tempfile::tempdir().unwrap();
    bookvibe(dir.path())
        .args(["settings", "set", "font_size", "huge"])
        .assert()
        .failure();
}

#[test]
fn favorites_add_remove_list() {
    let dir = tempfile::tempdir().unwrap();
    bookvibe(dir.path()).args(["favorites", "add", "84"]).assert().success();
    bookvibe(dir.path()).args(["favorites", "add", "1342"]).assert().success();
    bookvibe(dir.path()).args(["favorites", "remove", "84"]).assert().success();
    let out = bookvibe(dir.path())
        .args(["favorites", "list", "--json"])
        .assert()
        .success();
    let ids: Vec<u64> = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(ids, vec![1342]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn popular_lists_most_downloaded_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = bookvibe(dir.path())
        .env("BOOKVIBE_API_URL", format!("{}/books", server.uri()))
        .args(["popular", "--json"])
        .assert()
        .success();
    let v: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(v["books"][0]["id"], 2);
    assert_eq!(v["books"][0]["language"], "Deutsch");
    assert_eq!(v["books"][1]["author"], "Unknown Author");
    assert_eq!(v["hasMore"], false);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn list_failure_exits_nonzero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = bookvibe(dir.path())
        .env("BOOKVIBE_API_URL", format!("{}/books", server.uri()))
        .arg("list")
        .assert()
        .failure();
    let stderr = std::str::from_utf8(&out.get_output().stderr).unwrap();
    assert!(stderr.contains("Failed to fetch books"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn show_records_history_and_reports_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/84"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 84,
            "title": "Frankenstein",
            "authors": [{"name": "Shelley, Mary Wollstonecraft", "birth_year": 1797, "death_year": 1851}],
            "formats": {"application/epub+zip": "https://example.org/84.epub"},
            "download_count": 100
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/books/999999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = format!("{}/books", server.uri());

    let out = bookvibe(dir.path())
        .env("BOOKVIBE_API_URL", &api)
        .args(["show", "84"])
        .assert()
        .success();
    let stdout = std::str::from_utf8(&out.get_output().stdout).unwrap();
    assert!(stdout.contains("Frankenstein"));
    assert!(stdout.contains("Year: 1797"));

    let out = bookvibe(dir.path())
        .env("BOOKVIBE_API_URL", &api)
        .args(["show", "999999"])
        .assert()
        .failure();
    let stderr = std::str::from_utf8(&out.get_output().stderr).unwrap();
    assert!(stderr.contains("Book not found"));

    let out = bookvibe(dir.path())
        .args(["history", "--json"])
        .assert()
        .success();
    let ids: Vec<u64> = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(ids, vec![84]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn download_saves_file() {
    let server = MockServer::start().await;
    let epub_url = format!("{}/files/84.epub", server.uri());
    Mock::given(method("GET"))
        .and(path("/books/84"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 84,
            "title": "Frankenstein",
            "formats": {"application/epub+zip": epub_url},
            "download_count": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/84.epub"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"epub-bytes".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out").join("book.epub");
    bookvibe(dir.path())
        .env("BOOKVIBE_API_URL", format!("{}/books", server.uri()))
        .args(["download", "84", "-o", target.to_str().unwrap()])
        .assert()
        .success();
    assert_eq!(std::fs::read(&target).unwrap(), b"epub-bytes");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn download_without_output_uses_template_and_output_dir() {
    let server = MockServer::start().await;
    let txt_url = format!("{}/files/1342.txt", server.uri());
    Mock::given(method("GET"))
        .and(path("/books/1342"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1342,
            "title": "Pride and Prejudice",
            "authors": [{"name": "Austen, Jane", "birth_year": 1775, "death_year": 1817}],
            "formats": {"text/plain; charset=us-ascii": txt_url},
            "download_count": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/1342.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"It is a truth".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let saved = dir.path().join("saved");
    bookvibe(dir.path())
        .args(["config", "set", "download.output_dir", saved.to_str().unwrap()])
        .assert()
        .success();
    bookvibe(dir.path())
        .args(["config", "set", "download.template", "{id} {title|kebab}.{ext}"])
        .assert()
        .success();

    bookvibe(dir.path())
        .env("BOOKVIBE_API_URL", format!("{}/books", server.uri()))
        .args(["download", "1342"])
        .assert()
        .success();
    let target = saved.join("1342 Pride-and-Prejudice.txt");
    assert_eq!(std::fs::read(&target).unwrap(), b"It is a truth");
}
