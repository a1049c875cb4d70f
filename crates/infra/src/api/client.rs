//! API client for the asset-custody backend
//!
//! Issues single-attempt requests against the configured API base URL. The
//! session credential is attached per request from the injected
//! [`SessionProvider`].

use std::sync::Arc;
use std::time::Duration;

use actasti_core::AuthorizationPolicy;
use actasti_domain::ApiConfig;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use super::auth::SessionProvider;
use super::errors::ApiError;
use crate::http::{AuthorizationAttachment, HttpClient};

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., "http://localhost:3000/api/v1")
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
    /// Login endpoint, relative to `base_url`; never carries a credential
    pub login_path: String,
    /// Headers added to every request bound for the API
    pub extra_headers: Vec<(String, String)>,
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            login_path: config.login_path.clone(),
            extra_headers: config.extra_headers.clone(),
        }
    }
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

/// API client
pub struct ApiClient {
    http_client: HttpClient,
    attachment: AuthorizationAttachment,
    sessions: Arc<dyn SessionProvider>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns error if the base URL or extra headers are invalid, or the
    /// HttpClient cannot be created
    pub fn new(config: ApiClientConfig, sessions: Arc<dyn SessionProvider>) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {}", e)))?;

        let policy = AuthorizationPolicy::new(&config.base_url, &config.login_path)?;
        let attachment = AuthorizationAttachment::new(policy, &config.extra_headers)?;

        Ok(Self { http_client, attachment, sessions, config })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Parsed API base URL.
    pub fn base_url(&self) -> &Url {
        self.attachment.policy().api_base()
    }

    /// Absolute URL of an API path such as `/elementos`.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| ApiError::Config(format!("Invalid URL {raw}: {e}")))
    }

    /// Execute a GET request against an API path and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the status is not a success, or
    /// the body is not JSON
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        self.get_json_at(url, query).await
    }

    /// Execute a GET request against an absolute URL and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`get_json`](Self::get_json)
    pub async fn get_json_at(&self, url: Url, query: &[(String, String)]) -> Result<Value, ApiError> {
        debug!(url = %url, params = query.len(), "GET request");

        let mut builder = self.http_client.request(Method::GET, url);
        if !query.is_empty() {
            builder = builder.query(query);
        }

        let response = self.dispatch(builder).await?;
        Self::read_json(response).await
    }

    /// Execute a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the status is not a success, or
    /// the body is not JSON
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        debug!(url = %url, "POST request");

        let builder = self.http_client.request(Method::POST, url).json(body);
        let response = self.dispatch(builder).await?;
        let result = Self::read_json(response).await?;

        info!(path = %path, "POST request successful");
        Ok(result)
    }

    /// Download a binary document, returning its bytes and content type.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not a success
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_bytes(&self, url: Url) -> Result<(Vec<u8>, Option<String>), ApiError> {
        let builder = self.http_client.request(Method::GET, url);
        let response = self.dispatch(builder).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))?;

        Ok((bytes.to_vec(), content_type))
    }

    async fn dispatch(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = self.http_client.build(builder)?;
        let session = self.sessions.current_session();
        let request = self.attachment.attach(request, session.as_deref());
        let url = request.url().to_string();

        let response = self.http_client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &url, &body));
        }
        Ok(response)
    }

    async fn read_json(response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        // These status codes have no body by RFC spec
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return Ok(Value::Null);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Decode(format!("Failed to parse response: {}", e)))
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    sessions: Option<Arc<dyn SessionProvider>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the session source used for bearer credentials
    pub fn sessions(mut self, sessions: Arc<dyn SessionProvider>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if required fields are missing or client creation fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let sessions = self
            .sessions
            .ok_or_else(|| ApiError::Config("Session provider not set".to_string()))?;

        ApiClient::new(config, sessions)
    }
}

#[cfg(test)]
mod tests {
    use actasti_domain::Session;
    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::SessionStore;

    fn client_for(server: &MockServer, store: Arc<SessionStore>) -> ApiClient {
        let config = ApiClientConfig { base_url: format!("{}/api/v1", server.uri()), ..Default::default() };
        ApiClient::new(config, store).unwrap()
    }

    fn logged_in(token: &str) -> Arc<SessionStore> {
        let store = Arc::new(SessionStore::new());
        store.replace(Session::new("ana", token, Utc::now(), chrono::Duration::hours(8)).unwrap());
        store
    }

    #[tokio::test]
    async fn test_get_with_json_response_and_bearer() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/elementos"))
            .and(query_param("page", "2"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, logged_in("test-token"));
        let params = vec![("page".to_string(), "2".to_string())];

        let result = client.get_json("/elementos", &params).await.unwrap();
        assert_eq!(result, json!({ "data": [] }));
    }

    #[tokio::test]
    async fn test_login_request_carries_no_credential() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .and(body_json(json!({ "username": "ana" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t" })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, logged_in("stale"));
        client.post_json("/auth/login", &json!({ "username": "ana" })).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_status_errors_are_classified() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/users/ana"))
            .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/luis"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Arc::new(SessionStore::new()));

        let err = client.get_json("/users/ana", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(ref msg) if msg.contains("expired")));

        let err = client.get_json("/users/luis", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_and_invalid_bodies() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/asignacion/reactivar-asignacion"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/tiendas"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Arc::new(SessionStore::new()));

        let value =
            client.post_json("/asignacion/reactivar-asignacion", &json!({ "token": "x" })).await.unwrap();
        assert_eq!(value, Value::Null);

        let err = client.get_json("/tiendas", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_extra_headers_are_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/tiendas"))
            .and(header("ngrok-skip-browser-warning", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = ApiClientConfig {
            base_url: format!("{}/api/v1", mock_server.uri()),
            extra_headers: vec![("ngrok-skip-browser-warning".into(), "true".into())],
            ..Default::default()
        };
        let client = ApiClient::new(config, Arc::new(SessionStore::new())).unwrap();

        client.get_json("/tiendas", &[]).await.unwrap();
    }

    #[tokio::test]
    async fn test_builder_missing_sessions() {
        let result = ApiClient::builder().build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[tokio::test]
    async fn test_builder_pattern() {
        let client = ApiClient::builder().sessions(Arc::new(SessionStore::new())).build();
        assert!(client.is_ok());
    }
}
