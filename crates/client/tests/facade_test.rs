//! End-to-end facade tests against a local mock server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use trellis_client::{ApiClient, ClientConfig, ClientError, MemoryTokenStore, RequestOverrides};
use trellis_domain::{FilePart, FormMap, FormValue, Query};
use url::Url;

fn bearer_token(offset_secs: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(
        r#"{{"exp":{}}}"#,
        Utc::now().timestamp() + offset_secs
    ));
    format!("{header}.{payload}.sig")
}

fn client_for(server: &mockito::Server, token: Option<String>) -> ApiClient {
    let config = ClientConfig::new(Url::parse(&server.url()).unwrap());
    let store = token.map_or_else(MemoryTokenStore::new, MemoryTokenStore::with_token);
    ApiClient::new(config, Arc::new(store)).unwrap()
}

#[tokio::test]
async fn get_sends_bearer_header_and_query() {
    let mut server = mockito::Server::new_async().await;
    let token = bearer_token(3600);
    let mock = server
        .mock("GET", "/users/42?page=2")
        .match_header("authorization", format!("Bearer {token}").as_str())
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body(r#"{"id":42}"#)
        .create_async()
        .await;

    let client = client_for(&server, Some(token));
    let mut query = FormMap::new();
    query.insert("page".to_string(), FormValue::Int(2));

    let response = client
        .get("/users/", "42", &Query::Form(query))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(response.status.is_success());
    assert_eq!(response.text(), r#"{"id":42}"#);
}

#[tokio::test]
async fn get_no_auth_never_sends_authorization() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/public/info")
        .match_header("authorization", mockito::Matcher::Missing)
        .with_status(200)
        .create_async()
        .await;

    // A valid token exists; the no-auth entry point must still ignore it.
    let client = client_for(&server, Some(bearer_token(3600)));
    client
        .get_no_auth("/public/info", "", &Query::None)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn expired_token_sends_no_authorization() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/users/1")
        .match_header("authorization", mockito::Matcher::Missing)
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server, Some(bearer_token(-3600)));
    client.get("/users/", "1", &Query::None).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn post_sends_flattened_urlencoded_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/reports")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(mockito::Matcher::Exact(
            "a.b=1&a.c%5B0%5D=2&a.c%5B1%5D=3".to_string(),
        ))
        .with_status(201)
        .create_async()
        .await;

    let mut inner = FormMap::new();
    inner.insert("b".to_string(), FormValue::Int(1));
    inner.insert(
        "c".to_string(),
        FormValue::List(vec![FormValue::Int(2), FormValue::Int(3)]),
    );
    let mut fields = FormMap::new();
    fields.insert("a".to_string(), FormValue::Map(inner));

    let client = client_for(&server, None);
    client.post("/reports", &Query::None, &fields).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn put_sends_json_body_as_is() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/users/7")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Json(serde_json::json!({"name": "bob"})))
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server, None);
    client
        .put("/users/7", &Query::None, &serde_json::json!({"name": "bob"}))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn delete_attaches_optional_json_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/users")
        .match_body(mockito::Matcher::Json(serde_json::json!({"ids": [1, 2]})))
        .with_status(204)
        .create_async()
        .await;

    let client = client_for(&server, None);
    client
        .delete("/users", &Query::None, Some(&serde_json::json!({"ids": [1, 2]})))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn post_no_auth_overrides_take_precedence() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/ingest")
        .match_header("content-type", "text/csv")
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server, None);
    let overrides =
        RequestOverrides::new().with_header(CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    client
        .post_no_auth("/ingest", &Query::None, &serde_json::json!({}), Some(overrides))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_invokes_hook_and_propagates() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/private")
        .with_status(401)
        .with_body(r#"{"message":"session expired"}"#)
        .create_async()
        .await;

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_hook = Arc::clone(&calls);

    let config = ClientConfig::new(Url::parse(&server.url()).unwrap());
    let client = ApiClient::new(config, Arc::new(MemoryTokenStore::new()))
        .unwrap()
        .with_on_unauthorized(move || {
            calls_in_hook.fetch_add(1, Ordering::SeqCst);
        });

    let err = client.get("/private", "", &Query::None).await.unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("session expired"));
}

#[tokio::test]
async fn server_error_propagates_without_hook() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/flaky")
        .with_status(500)
        .with_body("oops")
        .create_async()
        .await;

    let client = client_for(&server, None);
    let err = client.get("/flaky", "", &Query::None).await.unwrap_err();

    match err {
        ClientError::Status { status, server_message } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(server_message, None);
        }
        other => panic!("expected status error, got {other}"),
    }
}

#[tokio::test]
async fn download_excel_post_saves_when_finished() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/export")
        .with_status(200)
        .with_body("PK\x03\x04fake-xlsx")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::new(Url::parse(&server.url()).unwrap())
        .with_download_dir(dir.path());
    let client = ApiClient::new(config, Arc::new(MemoryTokenStore::new())).unwrap();

    let download = client
        .download_excel_post("/export", &Query::None, &FormMap::new(), None, true)
        .await
        .unwrap();

    let path = download.saved_to.unwrap();
    assert_eq!(path, dir.path().join("excel_table.xlsx"));
    assert_eq!(std::fs::read(path).unwrap(), b"PK\x03\x04fake-xlsx");
}

#[tokio::test]
async fn download_excel_post_skips_save_when_not_finished() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/export")
        .with_status(200)
        .with_body("partial")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::new(Url::parse(&server.url()).unwrap())
        .with_download_dir(dir.path());
    let client = ApiClient::new(config, Arc::new(MemoryTokenStore::new())).unwrap();

    let download = client
        .download_excel_post("/export", &Query::None, &FormMap::new(), Some("report"), false)
        .await
        .unwrap();

    assert!(download.saved_to.is_none());
    assert_eq!(download.response.text(), "partial");
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn download_excel_get_saves_under_given_name() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/export/9")
        .with_status(200)
        .with_body("sheet-bytes")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::new(Url::parse(&server.url()).unwrap())
        .with_download_dir(dir.path());
    let client = ApiClient::new(config, Arc::new(MemoryTokenStore::new())).unwrap();

    let download = client
        .download_excel_get("/export/", "9", &Query::None, "quarterly")
        .await
        .unwrap();

    assert_eq!(download.saved_to.unwrap(), dir.path().join("quarterly.xlsx"));
}

#[tokio::test]
async fn download_excel_get_xlsm_uses_legacy_mime_and_extension() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/export/legacy/3")
        .match_header("content-type", "application/vnd.ms-excel")
        .with_status(200)
        .with_body("legacy-sheet")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::new(Url::parse(&server.url()).unwrap())
        .with_download_dir(dir.path());
    let client = ApiClient::new(config, Arc::new(MemoryTokenStore::new())).unwrap();

    let download = client
        .download_excel_get_xlsm("/export/legacy/", "3", &Query::None, "archive")
        .await
        .unwrap();

    mock.assert_async().await;
    let path = download.saved_to.unwrap();
    assert_eq!(path, dir.path().join("archive.xls"));
    assert_eq!(std::fs::read(path).unwrap(), b"legacy-sheet");
}

#[tokio::test]
async fn multipart_upload_reports_progress() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .match_header(
            "content-type",
            mockito::Matcher::Regex("multipart/form-data.*".to_string()),
        )
        .with_status(200)
        .create_async()
        .await;

    let mut fields = FormMap::new();
    fields.insert("label".to_string(), FormValue::from("bulk"));
    fields.insert(
        "file".to_string(),
        FormValue::File(FilePart::new("data.csv", vec![b'x'; 150_000])),
    );

    let last_seen = Arc::new(AtomicUsize::new(0));
    let last_in_cb = Arc::clone(&last_seen);

    let client = client_for(&server, None);
    client
        .upload_multipart_with_progress(
            "/upload",
            &Query::None,
            &fields,
            Arc::new(move |p| {
                last_in_cb.store(usize::try_from(p.sent).unwrap_or(usize::MAX), Ordering::SeqCst);
                assert_eq!(p.total, 150_000);
            }),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(last_seen.load(Ordering::SeqCst), 150_000);
}

#[tokio::test]
async fn raw_query_string_appended_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search?q=a%20b&lang=en")
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server, None);
    client
        .get("/search", "", &Query::from("q=a%20b&lang=en"))
        .await
        .unwrap();

    mock.assert_async().await;
}
