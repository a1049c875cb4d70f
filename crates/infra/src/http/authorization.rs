//! Bearer credential attachment
//!
//! Applies [`AuthorizationPolicy`] to outgoing `reqwest` requests. The
//! session is passed in explicitly by the caller; nothing here reads global
//! state.

use actasti_core::AuthorizationPolicy;
use actasti_domain::{ActasError, Result, Session};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Request;
use tracing::{debug, warn};

/// Decorates requests bound for the protected API
#[derive(Debug, Clone)]
pub struct AuthorizationAttachment {
    policy: AuthorizationPolicy,
    extra_headers: Vec<(HeaderName, HeaderValue)>,
}

impl AuthorizationAttachment {
    /// # Errors
    ///
    /// Returns `Config` when an extra header name or value is not valid HTTP.
    pub fn new(policy: AuthorizationPolicy, extra_headers: &[(String, String)]) -> Result<Self> {
        let extra_headers = extra_headers
            .iter()
            .map(|(name, value)| {
                let header = HeaderName::from_bytes(name.trim().as_bytes())
                    .map_err(|e| ActasError::Config(format!("invalid header name {name:?}: {e}")))?;
                let value = HeaderValue::from_str(value.trim())
                    .map_err(|e| ActasError::Config(format!("invalid value for {name}: {e}")))?;
                Ok((header, value))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { policy, extra_headers })
    }

    pub fn policy(&self) -> &AuthorizationPolicy {
        &self.policy
    }

    /// Attach the bearer credential and extra headers where the policy allows.
    pub fn attach(&self, mut request: Request, session: Option<&Session>) -> Request {
        let already_authorized = request.headers().contains_key(AUTHORIZATION);
        let credential = self.policy.authorization_for(request.url(), already_authorized, session);

        if let Some(credential) = credential {
            match HeaderValue::from_str(&credential) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    request.headers_mut().insert(AUTHORIZATION, value);
                    debug!(url = %request.url(), "Attached bearer credential");
                }
                Err(err) => warn!(error = %err, "Session token is not a valid header value"),
            }
        }

        if self.policy.targets_api(request.url()) {
            for (name, value) in &self.extra_headers {
                if !request.headers().contains_key(name) {
                    request.headers_mut().insert(name.clone(), value.clone());
                }
            }
        }
        request
    }
}
