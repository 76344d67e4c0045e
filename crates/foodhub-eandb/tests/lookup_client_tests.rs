//! # Integration Tests for the EAN-DB Client
//!
//! Exercises `EanDbClient` against wiremock servers to verify request
//! construction (bearer auth, endpoint shape), response parsing, image
//! download behavior, and the collapse-to-`None` error contract of
//! `fetch_product_data` — all without touching the live registry.

use std::time::Duration;

use foodhub_core::EanCode;
use foodhub_eandb::{EanDbClient, EanDbConfig, LookupError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> EanDbClient {
    EanDbClient::new(EanDbConfig::new(server.uri(), "test-token")).expect("client build")
}

fn ean() -> EanCode {
    EanCode::new("4006381333931").expect("valid ean")
}

/// Matches requests that carry no Authorization header at all.
struct WithoutAuthHeader;

impl wiremock::Match for WithoutAuthHeader {
    fn matches(&self, request: &wiremock::Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}

#[tokio::test]
async fn lookup_sends_bearer_and_extracts_full_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/4006381333931"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "balance": 42,
            "product": {
                "barcode": "4006381333931",
                "titles": {"ru": "Молоко", "en": "Milk"},
                "manufacturer": {"titles": {"ru": "Простоквашино"}},
                "barcodeDetails": {"country": "Россия"},
                "categories": [{"titles": {"ru": "Молочные продукты"}}],
                "images": []
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let media = tempfile::tempdir().expect("tempdir");
    let lookup = client(&server)
        .fetch_product_data(&ean(), media.path())
        .await
        .expect("lookup");

    assert_eq!(lookup.name.as_deref(), Some("Молоко"));
    assert_eq!(lookup.company.as_deref(), Some("Простоквашино"));
    assert_eq!(lookup.country.as_deref(), Some("Россия"));
    assert_eq!(lookup.category.as_deref(), Some("Молочные продукты"));
    assert!(lookup.image_path.is_none());
    assert!(lookup.is_complete());
}

#[tokio::test]
async fn lookup_falls_back_to_english_title() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/5901234123457"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "product": {"titles": {"en": "Dark Chocolate"}}
        })))
        .mount(&server)
        .await;

    let media = tempfile::tempdir().expect("tempdir");
    let code = EanCode::new("5901234123457").expect("valid ean");
    let lookup = client(&server)
        .fetch_product_data(&code, media.path())
        .await
        .expect("lookup");

    assert_eq!(lookup.name.as_deref(), Some("Dark Chocolate"));
    assert!(!lookup.is_complete());
}

#[tokio::test]
async fn not_found_maps_to_typed_error_and_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/4006381333931"))
        .respond_with(ResponseTemplate::new(404).set_body_string("unknown barcode"))
        .mount(&server)
        .await;

    let c = client(&server);
    let err = c.try_fetch(&ean()).await.unwrap_err();
    assert!(matches!(err, LookupError::NotFound { .. }));

    let media = tempfile::tempdir().expect("tempdir");
    assert!(c.fetch_product_data(&ean(), media.path()).await.is_none());
}

#[tokio::test]
async fn server_error_collapses_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/4006381333931"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let c = client(&server);
    let err = c.try_fetch(&ean()).await.unwrap_err();
    match err {
        LookupError::Api { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Api error, got {other:?}"),
    }

    let media = tempfile::tempdir().expect("tempdir");
    assert!(c.fetch_product_data(&ean(), media.path()).await.is_none());
}

#[tokio::test]
async fn malformed_json_collapses_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/4006381333931"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let media = tempfile::tempdir().expect("tempdir");
    assert!(client(&server)
        .fetch_product_data(&ean(), media.path())
        .await
        .is_none());
}

#[tokio::test]
async fn missing_product_payload_yields_empty_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/4006381333931"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"balance": 7})))
        .mount(&server)
        .await;

    let media = tempfile::tempdir().expect("tempdir");
    let lookup = client(&server)
        .fetch_product_data(&ean(), media.path())
        .await
        .expect("a 200 without product data is not a transport failure");
    assert!(!lookup.is_complete());
    assert!(lookup.name.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_registry_times_out_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/4006381333931"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"product": {}}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = EanDbConfig {
        base_url: server.uri(),
        token: "test-token".into(),
        timeout_secs: 1,
    };
    let c = EanDbClient::new(config).expect("client build");

    let err = c.try_fetch(&ean()).await.unwrap_err();
    assert!(matches!(err, LookupError::Timeout { timeout_secs: 1 }));

    let media = tempfile::tempdir().expect("tempdir");
    assert!(c.fetch_product_data(&ean(), media.path()).await.is_none());
}

#[tokio::test]
async fn image_is_downloaded_without_credentials() {
    let server = MockServer::start().await;
    let image_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/4006381333931"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "product": {
                "titles": {"ru": "Молоко"},
                "manufacturer": {"titles": {"ru": "Простоквашино"}},
                "barcodeDetails": {"country": "Россия"},
                "categories": [{"titles": {"ru": "Молочные продукты"}}],
                "images": [{"url": format!("{}/photos/milk.jpg", image_server.uri())}]
            }
        })))
        .mount(&server)
        .await;

    // The bearer token belongs to the registry; the image host must not see it.
    Mock::given(method("GET"))
        .and(path("/photos/milk.jpg"))
        .and(WithoutAuthHeader)
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg bytes".to_vec()))
        .expect(1)
        .mount(&image_server)
        .await;

    let media = tempfile::tempdir().expect("tempdir");
    let lookup = client(&server)
        .fetch_product_data(&ean(), media.path())
        .await
        .expect("lookup");

    assert_eq!(lookup.image_path.as_deref(), Some("product_images/milk.jpg"));
    let stored = std::fs::read(media.path().join("product_images/milk.jpg")).expect("stored file");
    assert_eq!(stored, b"jpeg bytes");
}

#[tokio::test]
async fn failed_image_download_keeps_the_record() {
    let server = MockServer::start().await;
    let image_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/4006381333931"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "product": {
                "titles": {"ru": "Молоко"},
                "manufacturer": {"titles": {"ru": "Простоквашино"}},
                "barcodeDetails": {"country": "Россия"},
                "categories": [{"titles": {"ru": "Молочные продукты"}}],
                "images": [{"url": format!("{}/gone.jpg", image_server.uri())}]
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&image_server)
        .await;

    let media = tempfile::tempdir().expect("tempdir");
    let lookup = client(&server)
        .fetch_product_data(&ean(), media.path())
        .await
        .expect("lookup");

    assert!(lookup.image_path.is_none());
    assert!(lookup.is_complete());
}
