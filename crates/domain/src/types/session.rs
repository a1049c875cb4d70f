//! Session model
//!
//! A session is created on login, read by whatever needs the bearer token,
//! and discarded on logout or expiry. It is never mutated in place; a new
//! login produces a new value.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ActasError, Result};

/// Authenticated session, timestamps in epoch milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    username: String,
    token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cargo: Option<String>,
    issued_at: i64,
    expires_at: i64,
}

impl Session {
    /// Create a session starting at `issued_at` and lasting `duration`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank username or token, or a
    /// non-positive duration.
    pub fn new(
        username: &str,
        token: &str,
        issued_at: DateTime<Utc>,
        duration: Duration,
    ) -> Result<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ActasError::InvalidInput("username must not be empty".into()));
        }
        if token.trim().is_empty() {
            return Err(ActasError::InvalidInput("session token must not be empty".into()));
        }
        if duration <= Duration::zero() {
            return Err(ActasError::InvalidInput("session duration must be positive".into()));
        }

        let issued_at_ms = issued_at.timestamp_millis();
        Ok(Self {
            username: username.to_string(),
            token: token.to_string(),
            name: None,
            cargo: None,
            issued_at: issued_at_ms,
            expires_at: issued_at_ms.saturating_add(duration.num_milliseconds()),
        })
    }

    /// Attach profile details returned by the login endpoint.
    pub fn with_profile(self, name: Option<String>, cargo: Option<String>) -> Self {
        Self { name, cargo, ..self }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Raw token as stored; see the authorization policy for normalization.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn cargo(&self) -> Option<&str> {
        self.cargo.as_deref()
    }

    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.expires_at
    }

    /// Restore a session from its stored JSON form.
    ///
    /// Anything malformed, including `expires_at <= issued_at`, yields
    /// `None` so the caller can discard the stored value.
    pub fn from_stored_json(raw: &str) -> Option<Self> {
        let session: Self = serde_json::from_str(raw).ok()?;
        (session.expires_at > session.issued_at
            && !session.username.trim().is_empty()
            && !session.token.is_empty())
        .then_some(session)
    }

    /// Serialize into the stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if serialization fails.
    pub fn to_stored_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ActasError::Internal(format!("failed to serialize session: {e}")))
    }
}

/// Whether a post-login redirect stays inside the application.
pub fn is_safe_redirect(redirect: Option<&str>) -> bool {
    redirect.is_some_and(|r| r.starts_with('/') && !r.starts_with("//"))
}
