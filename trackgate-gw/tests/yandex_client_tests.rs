//! Yandex Music client tests against a mock HTTP server

use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trackgate_gw::services::yandex_client::sign_path;
use trackgate_gw::services::{
    CatalogClient, CatalogError, YandexConfig, YandexMusicClient, DOWNLOAD_FORMAT,
};

const STORAGE_PATH: &str = "/music/12345.mp3";
const STORAGE_TS: &str = "0005f1a2b3c4";
const STORAGE_S: &str = "per-download-secret";

fn client_for(server: &MockServer, token: Option<&str>) -> YandexMusicClient {
    YandexMusicClient::new(YandexConfig {
        token: token.map(str::to_string),
        api_base: server.uri(),
        storage_scheme: "http".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

async fn mount_track(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/tracks/12345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "invocationInfo": { "req-id": "test" },
            "result": [{
                "id": "12345",
                "title": "Loner",
                "artists": [{ "id": 1, "name": "Artist One" }, { "id": 2, "name": "Artist Two" }],
                "albums": [{ "id": 7, "year": 2019 }]
            }]
        })))
        .mount(server)
        .await;
}

async fn mount_download_info(server: &MockServer, codec: &str) {
    Mock::given(method("GET"))
        .and(path("/tracks/12345/download-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {
                    "codec": "aac",
                    "bitrateInKbps": 192,
                    "downloadInfoUrl": format!("{}/storage-info/aac", server.uri())
                },
                {
                    "codec": codec,
                    "bitrateInKbps": 192,
                    "downloadInfoUrl": format!("{}/storage-info/mp3", server.uri())
                }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_track_found() {
    let server = MockServer::start().await;
    mount_track(&server).await;

    let track = client_for(&server, None)
        .fetch_track("12345")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(track.title, "Loner");
    assert_eq!(track.joined_artists(), "Artist One, Artist Two");
    assert_eq!(track.release_year(), 2019);
}

#[tokio::test]
async fn test_fetch_track_empty_result_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .mount(&server)
        .await;

    let track = client_for(&server, None).fetch_track("0").await.unwrap();
    assert!(track.is_none());
}

#[tokio::test]
async fn test_fetch_track_404_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "name": "not-found" }
        })))
        .mount(&server)
        .await;

    let track = client_for(&server, None).fetch_track("999").await.unwrap();
    assert!(track.is_none());
}

#[tokio::test]
async fn test_fetch_track_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/12345"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client_for(&server, None).fetch_track("12345").await;
    assert!(matches!(result, Err(CatalogError::ApiError(500, ref body)) if body == "boom"));
}

#[tokio::test]
async fn test_fetch_track_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/12345"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client_for(&server, None).fetch_track("12345").await;
    assert!(matches!(result, Err(CatalogError::ParseError(_))));
}

#[tokio::test]
async fn test_oauth_header_sent_when_token_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/12345"))
        .and(header("authorization", "OAuth test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "title": "Loner", "artists": [], "albums": [] }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let track = client_for(&server, Some("test-token"))
        .fetch_track("12345")
        .await
        .unwrap();
    assert!(track.is_some());
}

#[tokio::test]
async fn test_download_follows_signed_storage_link() {
    let server = MockServer::start().await;
    mount_download_info(&server, "mp3").await;

    Mock::given(method("GET"))
        .and(path("/storage-info/mp3"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "host": server.address().to_string(),
            "path": STORAGE_PATH,
            "ts": STORAGE_TS,
            "regional": 1,
            "s": STORAGE_S
        })))
        .expect(1)
        .mount(&server)
        .await;

    let signed = format!(
        "/get-mp3/{}/{}{}",
        sign_path(STORAGE_PATH, STORAGE_S),
        STORAGE_TS,
        STORAGE_PATH
    );
    Mock::given(method("GET"))
        .and(path(signed.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3 mp3 payload".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("12345.mp3");
    client_for(&server, None)
        .download("12345", DOWNLOAD_FORMAT, &dest)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"ID3 mp3 payload");
}

#[tokio::test]
async fn test_download_without_matching_variant() {
    let server = MockServer::start().await;
    mount_download_info(&server, "flac").await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("12345.mp3");
    let result = client_for(&server, None)
        .download("12345", DOWNLOAD_FORMAT, &dest)
        .await;

    assert!(matches!(
        result,
        Err(CatalogError::NoMatchingVariant { bitrate_kbps: 192, .. })
    ));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_download_storage_failure() {
    let server = MockServer::start().await;
    mount_download_info(&server, "mp3").await;
    Mock::given(method("GET"))
        .and(path("/storage-info/mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "host": server.address().to_string(),
            "path": STORAGE_PATH,
            "ts": STORAGE_TS,
            "s": STORAGE_S
        })))
        .mount(&server)
        .await;
    // No storage mock: wiremock answers 404

    let dir = TempDir::new().unwrap();
    let result = client_for(&server, None)
        .download("12345", DOWNLOAD_FORMAT, &dir.path().join("12345.mp3"))
        .await;

    assert!(matches!(result, Err(CatalogError::ApiError(404, _))));
}
