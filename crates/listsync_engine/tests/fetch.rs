use std::time::Duration;

use listsync_engine::{FailureKind, FetchSettings, Fetcher, ReqwestFetcher};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_for(server: &MockServer) -> ReqwestFetcher {
    ReqwestFetcher::new(FetchSettings::with_base_url(server.uri())).expect("client")
}

#[tokio::test]
async fn fetcher_decodes_page_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/samples/"))
        .and(query_param("ordering", "-name"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": "http://backend/api/samples/?ordering=-name&page=2",
            "previous": null,
            "results": [{"id": 1}, {"id": 2}]
        })))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let page = fetcher
        .fetch_page("/api/samples/?ordering=-name")
        .await
        .expect("fetch ok");

    assert_eq!(page.count, 3);
    assert_eq!(
        page.next.as_deref(),
        Some("http://backend/api/samples/?ordering=-name&page=2")
    );
    assert_eq!(page.previous, None);
    let ids: Vec<_> = page.results.iter().filter_map(|e| e.id()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn fetcher_follows_absolute_next_locator() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/samples/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": null,
            "previous": "/api/samples/",
            "results": [{"id": 3}]
        })))
        .mount(&server)
        .await;

    // Base URL is irrelevant for absolute locators.
    let fetcher = ReqwestFetcher::new(FetchSettings::with_base_url("http://unused.invalid"))
        .expect("client");
    let locator = format!("{}/api/samples/?page=2", server.uri());
    let page = fetcher.fetch_page(&locator).await.expect("fetch ok");

    assert_eq!(page.next, None);
    assert_eq!(page.results.len(), 1);
}

#[tokio::test]
async fn fetcher_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/processes/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "a"}, {"id": "b"}])))
        .mount(&server)
        .await;

    let page = fetcher_for(&server)
        .fetch_page("/api/processes/")
        .await
        .expect("fetch ok");

    assert_eq!(page.count, 2);
    assert_eq!(page.next, None);
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/samples/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch_page("/api/samples/")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn fetcher_fails_on_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/samples/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "nope"})))
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch_page("/api/samples/")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/slow/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"count": 0, "results": []})),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::with_base_url(server.uri())
    };
    let fetcher = ReqwestFetcher::new(settings).expect("client");

    let err = fetcher.fetch_page("/api/slow/").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/large/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"count":0,"results":[]}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::with_base_url(server.uri())
    };
    let fetcher = ReqwestFetcher::new(settings).expect("client");

    let err = fetcher.fetch_page("/api/large/").await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 10, .. }));
}

#[tokio::test]
async fn fetcher_rejects_unresolvable_locator() {
    let fetcher =
        ReqwestFetcher::new(FetchSettings::with_base_url("not a url")).expect("client");

    let err = fetcher.fetch_page("/api/samples/").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidLocator);

    let err = fetcher.fetch_page("  ").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidLocator);
}

#[tokio::test]
async fn fetcher_reports_network_failure() {
    // Nothing listens on the discard port.
    let fetcher =
        ReqwestFetcher::new(FetchSettings::with_base_url("http://127.0.0.1:9")).expect("client");

    let err = fetcher.fetch_page("/api/samples/").await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
}
