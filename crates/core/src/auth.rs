//! Authorization policy for outgoing requests
//!
//! Decides whether a request gets `Authorization: Bearer <token>` attached.
//! The decision is pure; the HTTP layer applies it.

use actasti_domain::{ActasError, Result, Session};
use url::Url;

/// Which requests carry the session token
#[derive(Debug, Clone)]
pub struct AuthorizationPolicy {
    api_base: Url,
    login_path: String,
}

impl AuthorizationPolicy {
    /// # Errors
    ///
    /// Returns `Config` when `api_url` is not an absolute URL.
    pub fn new(api_url: &str, login_path: &str) -> Result<Self> {
        let api_base = Url::parse(api_url)
            .map_err(|e| ActasError::Config(format!("invalid API URL {api_url:?}: {e}")))?;
        let login_path = format!("/{}", login_path.trim().trim_matches('/'));
        Ok(Self { api_base, login_path })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Whether `url` points at the protected API, by prefix or by origin.
    pub fn targets_api(&self, url: &Url) -> bool {
        let base = self.api_base.as_str().trim_end_matches('/');
        url.as_str().starts_with(base) || url.origin() == self.api_base.origin()
    }

    pub fn is_login_request(&self, url: &Url) -> bool {
        url.path().trim_end_matches('/').ends_with(&self.login_path)
    }

    /// Whether a token should be attached to a request to `url`.
    ///
    /// `already_authorized` is true when the request carries its own
    /// `Authorization` header, which is never overwritten.
    pub fn should_attach(&self, url: &Url, already_authorized: bool) -> bool {
        !already_authorized && self.targets_api(url) && !self.is_login_request(url)
    }

    /// Header value to attach, if any.
    pub fn authorization_for(
        &self,
        url: &Url,
        already_authorized: bool,
        session: Option<&Session>,
    ) -> Option<String> {
        if !self.should_attach(url, already_authorized) {
            return None;
        }
        let token = normalize_bearer_token(session?.token())?;
        Some(format!("Bearer {token}"))
    }
}

/// Clean a stored token: trim, drop surrounding quotes and any leading
/// `Bearer` prefix. Returns `None` when nothing is left.
pub fn normalize_bearer_token(raw: &str) -> Option<String> {
    let mut token = strip_quotes(raw.trim());

    if let Some(prefix) = token.get(..6) {
        let rest = &token[6..];
        if prefix.eq_ignore_ascii_case("bearer")
            && (rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            token = strip_quotes(rest.trim());
        }
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
            return inner.trim();
        }
    }
    value
}
