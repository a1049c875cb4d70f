//! Session ownership and login
//!
//! [`SessionStore`] holds the current session and hands it to the API client
//! through [`SessionProvider`]. [`AuthService`] performs the login exchange
//! and replaces the stored session on success.

use std::sync::Arc;

use actasti_core::{extract_login_token, extract_profile};
use actasti_domain::constants::SESSION_STORAGE_KEY;
use actasti_domain::{ActasError, Result, Session, SessionConfig};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use super::client::ApiClient;

/// Longest session lifetime accepted from configuration, one year.
const MAX_SESSION_HOURS: i64 = 24 * 365;

/// Source of the session whose credential decorates API requests
///
/// This trait allows dependency injection and testing with fixed sessions.
pub trait SessionProvider: Send + Sync {
    /// Current unexpired session, if any.
    fn current_session(&self) -> Option<Arc<Session>>;
}

/// In-memory owner of the current session
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session, discarding it if it has expired.
    pub fn current(&self) -> Option<Arc<Session>> {
        self.current_at(Utc::now())
    }

    pub fn current_at(&self, now: DateTime<Utc>) -> Option<Arc<Session>> {
        let session = self.current.read().clone()?;
        if session.is_expired_at(now) {
            info!(username = %session.username(), "Session expired");
            self.clear();
            return None;
        }
        Some(session)
    }

    /// Install a new session, returning the shared handle.
    pub fn replace(&self, session: Session) -> Arc<Session> {
        let session = Arc::new(session);
        *self.current.write() = Some(Arc::clone(&session));
        session
    }

    pub fn clear(&self) {
        self.current.write().take();
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Storage entry for the current session: key and serialized value.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the session cannot be serialized.
    pub fn export(&self) -> Result<Option<(&'static str, String)>> {
        self.current()
            .map(|session| session.to_stored_json().map(|raw| (SESSION_STORAGE_KEY, raw)))
            .transpose()
    }

    /// Restore a previously exported session.
    ///
    /// Malformed or expired values are discarded and leave the store empty.
    pub fn restore(&self, raw: &str) -> bool {
        self.restore_at(raw, Utc::now())
    }

    pub fn restore_at(&self, raw: &str, now: DateTime<Utc>) -> bool {
        match Session::from_stored_json(raw) {
            Some(session) if !session.is_expired_at(now) => {
                debug!(username = %session.username(), "Restored stored session");
                self.replace(session);
                true
            }
            Some(_) => {
                debug!("Stored session already expired");
                self.clear();
                false
            }
            None => {
                warn!("Discarding malformed stored session");
                self.clear();
                false
            }
        }
    }
}

impl SessionProvider for SessionStore {
    fn current_session(&self) -> Option<Arc<Session>> {
        self.current()
    }
}

/// Login and logout against the backend
pub struct AuthService {
    client: Arc<ApiClient>,
    store: Arc<SessionStore>,
    session_duration: Duration,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>, store: Arc<SessionStore>, config: &SessionConfig) -> Self {
        Self { client, store, session_duration: session_duration(config) }
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for blank credentials, `ShapeMismatch` when
    /// the response carries no token, or the mapped API error.
    #[instrument(skip(self, password), fields(username = %username.trim()))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Arc<Session>> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ActasError::InvalidInput("username and password are required".into()));
        }

        let body = json!({ "username": username, "password": password });
        let payload = self.client.post_json(&self.client.config().login_path, &body).await?;

        let token = extract_login_token(&payload).ok_or_else(|| {
            ActasError::ShapeMismatch("login response carried no token".into())
        })?;
        let profile = extract_profile(&payload);

        let session = Session::new(username, &token, Utc::now(), self.session_duration)?
            .with_profile(profile.name, profile.cargo);

        info!("Login successful");
        Ok(self.store.replace(session))
    }

    pub fn logout(&self) {
        self.store.clear();
        info!("Logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn current_session(&self) -> Option<Arc<Session>> {
        self.store.current()
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }
}

/// Configured session lifetime, capped at [`MAX_SESSION_HOURS`].
fn session_duration(config: &SessionConfig) -> Duration {
    let hours = i64::try_from(config.duration_hours)
        .map_or(MAX_SESSION_HOURS, |hours| hours.min(MAX_SESSION_HOURS));
    Duration::hours(hours)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::ApiClientConfig;

    fn session(hours: i64) -> Session {
        Session::new("ana", "tok", Utc::now(), Duration::hours(hours)).unwrap()
    }

    #[test]
    fn expired_sessions_are_discarded() {
        let store = SessionStore::new();
        let stored = store.replace(session(1));

        let later = Utc::now() + Duration::hours(2);
        assert!(store.current_at(later).is_none());
        assert!(store.current().is_none());
        assert_eq!(stored.username(), "ana");
    }

    #[test]
    fn export_and_restore_round_trip() {
        let store = SessionStore::new();
        assert!(store.export().unwrap().is_none());

        store.replace(session(8).with_profile(Some("Ana Ruiz".into()), None));
        let (key, raw) = store.export().unwrap().unwrap();
        assert_eq!(key, SESSION_STORAGE_KEY);

        let restored = SessionStore::new();
        assert!(restored.restore(&raw));
        assert_eq!(restored.current().unwrap().name(), Some("Ana Ruiz"));
    }

    #[test]
    fn restore_discards_malformed_or_expired_values() {
        let store = SessionStore::new();
        store.replace(session(8));

        assert!(!store.restore("{not json"));
        assert!(store.current().is_none());

        let raw = session(1).to_stored_json().unwrap();
        assert!(!store.restore_at(&raw, Utc::now() + Duration::hours(3)));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn session_lifetime_is_capped_at_one_year() {
        let hours = |duration_hours| session_duration(&SessionConfig { duration_hours });

        assert_eq!(hours(8), Duration::hours(8));
        assert_eq!(hours(24 * 365 + 1), Duration::hours(24 * 365));
        assert_eq!(hours(u64::MAX), Duration::hours(24 * 365));
    }

    async fn auth_service(server: &MockServer) -> AuthService {
        let store = Arc::new(SessionStore::new());
        let config =
            ApiClientConfig { base_url: format!("{}/api/v1", server.uri()), ..Default::default() };
        let client = Arc::new(ApiClient::new(config, store.clone()).unwrap());
        AuthService::new(client, store, &SessionConfig::default())
    }

    #[tokio::test]
    async fn login_stores_session_with_profile() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .and(body_json(json!({ "username": "ana", "password": "secret" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "token": "jwt-1", "user": { "nombre": "Ana Ruiz", "cargo": "Analista" } }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = auth_service(&mock_server).await;
        let session = auth.login(" ana ", "secret").await.unwrap();

        assert_eq!(session.token(), "jwt-1");
        assert_eq!(session.name(), Some("Ana Ruiz"));
        assert_eq!(session.expires_at() - session.issued_at(), 8 * 60 * 60 * 1000);
        assert!(auth.is_authenticated());

        auth.logout();
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn login_without_token_is_a_shape_mismatch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&mock_server)
            .await;

        let auth = auth_service(&mock_server).await;
        let err = auth.login("ana", "secret").await.unwrap_err();

        assert!(matches!(err, ActasError::ShapeMismatch(_)));
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn rejected_credentials_map_to_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
            .mount(&mock_server)
            .await;

        let auth = auth_service(&mock_server).await;

        assert!(matches!(auth.login("ana", "nope").await, Err(ActasError::Unauthorized(_))));
        assert!(matches!(auth.login("  ", "nope").await, Err(ActasError::InvalidInput(_))));
    }
}
