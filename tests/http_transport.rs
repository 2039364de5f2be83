//! HTTP transport behavior against a mock server: header construction,
//! status classification, raw-byte fetches.

use mockito::Matcher;
use pixvault::{Client, Error, HttpErrorKind, RunOptions};
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> Client {
    Client::builder()
        .api_key("secret")
        .endpoint(server.url())
        .build()
        .unwrap()
}

#[tokio::test]
async fn sends_api_key_and_json_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("api-key", "secret")
        .match_header("content-type", "application/json")
        .match_header("accept", "application/json")
        .match_body(Matcher::Json(json!([
            { "action": "album-info", "id": "a1" }
        ])))
        .with_status(200)
        .with_body(r#"[{ "success": true, "result": { "name": "Holiday" } }]"#)
        .create_async()
        .await;

    let mut client = client_for(&server);
    client.album_info("a1");
    let settled = client.run(RunOptions::new()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].result().unwrap()["name"], json!("Holiday"));
}

#[tokio::test]
async fn rate_limited_response_is_classified() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(429)
        .with_body("Too Many Requests")
        .create_async()
        .await;

    let mut client = client_for(&server);
    client.album_info("a1");
    let err = client.run(RunOptions::new()).await.unwrap_err();

    assert!(err.source.is_rate_limited());
    match err.source {
        Error::Http(http) => {
            assert_eq!(http.status, 429);
            assert_eq!(http.kind, HttpErrorKind::RateLimited);
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_classified() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(500)
        .create_async()
        .await;

    let mut client = client_for(&server);
    client.image_info("i1");
    let err = client.run(RunOptions::new()).await.unwrap_err();

    match err.source {
        Error::Http(http) => {
            assert_eq!(http.kind, HttpErrorKind::ServerError);
            assert_eq!(http.message, "Internal Server Error");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    // Nothing listens on this port.
    let mut client = Client::builder()
        .api_key("secret")
        .endpoint("http://127.0.0.1:9")
        .build()
        .unwrap();
    client.album_info("a1");

    let err = client.run(RunOptions::new()).await.unwrap_err();
    assert!(matches!(err.source, Error::Transport(_)));
}

#[tokio::test]
async fn image_get_returns_raw_bytes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::Json(json!([
            { "action": "image-get", "id": "i1" }
        ])))
        .with_status(200)
        .with_body(&[0xFF, 0xD8, 0xFF, 0xE0][..])
        .create_async()
        .await;

    let client = client_for(&server);
    let bytes = client.image_get("i1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(&bytes[..], &[0xFF, 0xD8, 0xFF, 0xE0]);
}

#[tokio::test]
async fn missing_api_key_fails_at_build() {
    // No key on the builder; make sure the env fallback is not set either.
    std::env::remove_var("PIXVAULT_API_KEY");
    let err = Client::builder().build().unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}
