//! Responsible-user lookup.
//!
//! The backend has exposed users under several URL conventions over time, so
//! a lookup probes each of them until one yields the exact username. Results
//! are cached per normalized username.

use std::sync::Arc;

use actasti_core::{normalize_single, EndpointProber, QueryParam, RequestCache};
use actasti_domain::constants::{USERS_PATH, USER_NOT_FOUND_MESSAGE};
use actasti_domain::{ActasError, Result, User};
use serde_json::Value;
use tracing::instrument;

use crate::api::ApiClient;

pub struct UserService {
    client: Arc<ApiClient>,
    cache: RequestCache<String, User>,
}

impl UserService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client, cache: RequestCache::new("users") }
    }

    /// Resolve a user by exact username, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank username, `NotFound` with the
    /// user-facing message when no convention knows the user, or an aborting
    /// API error (401, 403, 5xx).
    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<User> {
        let wanted = username.trim();
        if wanted.is_empty() {
            return Err(ActasError::InvalidInput("username must not be empty".into()));
        }

        let client = Arc::clone(&self.client);
        let wanted = wanted.to_string();
        self.cache
            .get_or_fetch(wanted.to_lowercase(), move || async move {
                resolve_user(&client, &wanted).await
            })
            .await
    }

    /// Forget a cached lookup.
    pub fn invalidate(&self, username: &str) {
        self.cache.invalidate(&username.trim().to_lowercase());
    }
}

async fn resolve_user(client: &ApiClient, username: &str) -> Result<User> {
    let encoded = urlencoding::encode(username);
    let by_path = format!("{USERS_PATH}/{encoded}");
    let by_username = format!("{USERS_PATH}/by-username/{encoded}");
    let username_segment = format!("{USERS_PATH}/username/{encoded}");
    let query = vec![("username".to_string(), username.to_string())];

    EndpointProber::new(format!("user {username}"))
        .not_found_message(USER_NOT_FOUND_MESSAGE)
        .candidate("users/{username}", move || fetch(client, by_path, Vec::new()))
        .candidate("users?username=", move || fetch(client, USERS_PATH.to_string(), query))
        .candidate("users/by-username/{username}", move || fetch(client, by_username, Vec::new()))
        .candidate("users/username/{username}", move || {
            fetch(client, username_segment, Vec::new())
        })
        .resolve(|payload| normalize_single::<User>(&payload, Some(username)))
        .await
}

async fn fetch(client: &ApiClient, path: String, query: Vec<QueryParam>) -> Result<Value> {
    Ok(client.get_json(&path, &query).await?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::{ApiClientConfig, SessionStore};

    fn service_for(server: &MockServer) -> UserService {
        let config =
            ApiClientConfig { base_url: format!("{}/api/v1", server.uri()), ..Default::default() };
        UserService::new(Arc::new(ApiClient::new(config, Arc::new(SessionStore::new())).unwrap()))
    }

    #[tokio::test]
    async fn falls_through_to_query_convention() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/users/abc01"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users"))
            .and(query_param("username", "abc01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "id": 1, "name": "Prefix Match", "username": "ABC" },
                    { "id": "2", "name": "Exact Match", "username": "abc01" }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/by-username/abc01"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let service = service_for(&mock_server);
        let user = service.find_by_username(" abc01 ").await.unwrap();
        assert_eq!(user.name, "Exact Match");
        assert_eq!(user.id.as_str(), "2");

        // Served from cache, whatever the casing.
        let again = service.find_by_username("ABC01").await.unwrap();
        assert_eq!(again, user);
    }

    #[tokio::test]
    async fn exhausted_conventions_report_user_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(4)
            .mount(&mock_server)
            .await;

        let service = service_for(&mock_server);
        let err = service.find_by_username("ghost").await.unwrap_err();
        assert_eq!(err, ActasError::NotFound(USER_NOT_FOUND_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn unauthorized_aborts_the_probe() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;

        let service = service_for(&mock_server);
        let err = service.find_by_username("ana").await.unwrap_err();
        assert!(matches!(err, ActasError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn blank_usernames_are_rejected() {
        let mock_server = MockServer::start().await;
        let service = service_for(&mock_server);

        assert!(matches!(
            service.find_by_username("   ").await,
            Err(ActasError::InvalidInput(_))
        ));
    }
}
