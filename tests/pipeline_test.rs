use std::sync::Arc;
use universal_apidocs::config::FetchConfig;
use universal_apidocs::scraper::HttpFetcher;
use universal_apidocs::{ApiDocError, DocPipeline, ErrorKind, Format, HttpMethod};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USERS_JSON: &str = include_str!("fixtures/users.json");
const USERS_YAML: &str = include_str!("fixtures/users.yaml");
const USERS_HTML: &str = include_str!("fixtures/users.html");

fn pipeline() -> DocPipeline {
    let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
    DocPipeline::new(Arc::new(fetcher))
}

async fn serve(route: &str, body: &str, mime: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), mime))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_fetches_and_normalizes_openapi_json() {
    let server = serve("/openapi.json", USERS_JSON, "application/json").await;
    let url = format!("{}/openapi.json", server.uri());

    let doc = pipeline().ingest_url(&url, None).await.unwrap();
    assert!(doc.id.starts_with("openapi-"));
    assert_eq!(doc.url, url);
    assert_eq!(doc.title, "Test API");
    assert_eq!(doc.endpoints.len(), 2);
}

#[tokio::test]
async fn test_yaml_is_detected_from_body() {
    // text/plain carries no usable hint
    let server = serve("/spec", USERS_YAML, "text/plain").await;
    let url = format!("{}/spec", server.uri());

    let doc = pipeline().ingest_url(&url, None).await.unwrap();
    assert_eq!(doc.title, "Test API");
    assert!(doc.find_endpoint(HttpMethod::Post, "/users").is_some());
}

#[tokio::test]
async fn test_html_page_and_description_override() {
    let server = serve("/docs", USERS_HTML, "text/html; charset=utf-8").await;
    let url = format!("{}/docs", server.uri());

    let doc = pipeline()
        .ingest_url(&url, Some("Internal users API"))
        .await
        .unwrap();
    assert!(doc.id.starts_with("html-"));
    assert_eq!(doc.description, "Internal users API");
    assert_eq!(doc.endpoints.len(), 3);
}

#[tokio::test]
async fn test_non_success_status_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = pipeline()
        .ingest_url(&format!("{}/gone", server.uri()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiDocError::Network { status_code: 404 }));
}

#[tokio::test]
async fn test_unreachable_host_is_a_transport_error() {
    // bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let url = format!("http://127.0.0.1:{}/openapi.json", port);
    let err = pipeline().ingest_url(&url, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn test_structured_failure_is_returned_without_fallback() {
    let err = pipeline()
        .ingest_bytes("application/json", br#"{"hello": "world"}"#, "", None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotOpenApiDocument);
}

#[test]
fn test_fallback_retries_as_html() {
    let body = br#"{"hello": "world"}"#;
    let doc = pipeline()
        .with_html_fallback(true)
        .ingest_bytes("application/json", body, "https://example.com/x.json", None)
        .unwrap();

    assert!(doc.id.starts_with("html-"));
    assert_eq!(doc.title, "Unknown API");
    assert_eq!(doc.url, "https://example.com/x.json");
    assert!(doc.endpoints.is_empty());
}

#[test]
fn test_fallback_follows_candidate_order() {
    let body = b"name: not an api\nitems: []\n";
    assert_eq!(
        universal_apidocs::parser::candidate_formats("", body),
        vec![Format::Yaml, Format::Html]
    );

    let err = pipeline().ingest_bytes("", body, "", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotOpenApiDocument);

    let doc = pipeline()
        .with_html_fallback(true)
        .ingest_bytes("", body, "", None)
        .unwrap();
    assert!(doc.id.starts_with("html-"));
}

#[test]
fn test_explicit_format_skips_detection() {
    let err = pipeline()
        .ingest_with_format(Format::Json, USERS_HTML.as_bytes(), "", None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);

    let doc = pipeline()
        .ingest_with_format(Format::Html, USERS_HTML.as_bytes(), "", None)
        .unwrap();
    assert_eq!(doc.title, "Users Service");
}
