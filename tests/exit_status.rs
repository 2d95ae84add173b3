//! Process-level tests: exit status and the `Error:` line of the binary.

use std::collections::HashMap;
use std::path::Path;

use assert_cmd::Command;
use axum::routing::{get, patch};
use axum::{Form, Json, Router};
use predicates::str::contains;
use serde_json::json;
use tempfile::TempDir;

const TOKEN: &str = "secret-token";

fn edge_switch() -> Command {
    let mut cmd = Command::cargo_bin("edge-switch").unwrap();
    for var in [
        "FASTLY_API_TOKEN_ADMIN",
        "FASTLY_API_URL",
        "CONFIG_FILE",
        "LOG_LEVEL",
        "REQUEST_TIMEOUT_SECS",
        "REQUEST_RETRIES",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_services(dir: &Path) -> String {
    let path = dir.join("config.json");
    std::fs::write(
        &path,
        json!({"services": [{"name": "a.com", "id": "svc1"}]}).to_string(),
    )
    .unwrap();
    path.display().to_string()
}

async fn start_fake_api() -> String {
    let router = Router::new()
        .route(
            "/service/{service}",
            get(|| async {
                Json(json!({"id": "svc1", "versions": [{"number": 1, "active": false}]}))
            }),
        )
        .route(
            "/service/{service}/version/{number}/dictionary/{name}",
            get(|| async { Json(json!({"id": "dict-1", "name": "a_com"})) }),
        )
        .route(
            "/service/{service}/dictionary/{dictionary}/item/{key}",
            patch(|Form(form): Form<HashMap<String, String>>| async move {
                Json(json!({
                    "dictionary_id": "dict-1",
                    "service_id": "svc1",
                    "item_key": "west",
                    "item_value": form.get("item_value").cloned().unwrap_or_default(),
                }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn successful_switch_exits_zero() {
    let api_url = start_fake_api().await;
    let dir = TempDir::new().unwrap();
    let config = write_services(dir.path());

    let mut cmd = edge_switch();
    cmd.env("FASTLY_API_TOKEN_ADMIN", TOKEN).args([
        "switch",
        "--west",
        "true",
        "--json",
        "-c",
        config.as_str(),
        "--api-url",
        api_url.as_str(),
    ]);

    let assert = tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap();
    assert.success();
}

#[test]
fn missing_token_exits_one() {
    let dir = TempDir::new().unwrap();
    let config = write_services(dir.path());

    edge_switch()
        .args(["switch", "--json", "-c", config.as_str()])
        .assert()
        .code(1)
        .stderr(contains("Error: Missing API token: set FASTLY_API_TOKEN_ADMIN"));
}

#[test]
fn invalid_services_file_exits_one() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"services": []}"#).unwrap();

    edge_switch()
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(contains("at least one service must be defined"));
}

#[test]
fn init_exits_zero_and_writes_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    edge_switch()
        .args(["init", "-o", path.to_str().unwrap()])
        .assert()
        .success();
    assert!(path.exists());
}
