//! End-to-end inventory discovery over a mock backend
//!
//! **Coverage:**
//! - Declared total satisfied by the large-limit probe in two calls
//! - Page-by-page walk with an offset convention
//! - Bearer credential attached to every inventory request
//! - Request cap against a backend that always returns a full page

use actasti_domain::{Config, PaginationConfig, Session};
use actasti_infra::Services;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn item(n: usize) -> Value {
    json!({ "serial": format!("SN-{n:04}"), "modelo": "Latitude 5440", "estado": "Disponible" })
}

fn items(range: std::ops::Range<usize>) -> Vec<Value> {
    range.map(item).collect()
}

fn services_for(server: &MockServer, pagination: PaginationConfig) -> Services {
    let mut config = Config::default();
    config.api.api_url = format!("{}/api/v1", server.uri());
    config.pagination = pagination;
    Services::from_config(&config).expect("services should build")
}

fn login(services: &Services, token: &str) {
    let session = Session::new("ana", token, Utc::now(), Duration::hours(8)).unwrap();
    services.sessions.replace(session);
}

#[tokio::test]
async fn declared_total_is_fetched_in_two_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/elementos"))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": items(0..250),
            "total": 250,
            "limit": 250
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/elementos"))
        .and(query_param_is_missing("limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [item(0)],
            "total": 250,
            "limit": 100
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let services = services_for(&mock_server, PaginationConfig::default());
    let snapshot = services.inventory.snapshot().await.unwrap();

    assert_eq!(snapshot.len(), 250);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

/// Backend that ignores every paging parameter except `offset`.
struct OffsetBackend {
    total: usize,
    page: usize,
}

impl Respond for OffsetBackend {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let offset = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "offset")
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .unwrap_or(0);
        let end = (offset + self.page).min(self.total);
        let start = offset.min(end);

        ResponseTemplate::new(200).set_body_json(json!({ "rows": items(start..end) }))
    }
}

#[tokio::test]
async fn offset_backend_is_walked_page_by_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/elementos"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(OffsetBackend { total: 230, page: 100 })
        .mount(&mock_server)
        .await;

    let services = services_for(&mock_server, PaginationConfig::default());
    login(&services, "\"Bearer tok-1\"");

    let snapshot = services.inventory.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 230);
    assert_eq!(snapshot[229].serial.as_deref(), Some("SN-0229"));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.headers.get("authorization").is_some()));
}

#[tokio::test]
async fn always_full_backend_stays_within_request_cap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/elementos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(items(0..100))))
        .mount(&mock_server)
        .await;

    let pagination = PaginationConfig { max_requests: 6, ..PaginationConfig::default() };
    let services = services_for(&mock_server, pagination);

    let snapshot = services.inventory.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 100);
    assert!(mock_server.received_requests().await.unwrap().len() <= 6);
}

#[tokio::test]
async fn unauthorized_initial_request_surfaces() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/elementos"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&mock_server)
        .await;

    let services = services_for(&mock_server, PaginationConfig::default());

    let err = services.inventory.snapshot().await.unwrap_err();
    assert!(matches!(err, actasti_domain::ActasError::Unauthorized(_)));

    // Failures are not cached.
    assert!(services.inventory.snapshot().await.is_err());
}
