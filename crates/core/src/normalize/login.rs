//! Login response readers

use serde_json::Value;

use super::fields::{first_text, lookup};

const TOKEN_KEYS: &[&str] = &["token", "accessToken", "access_token", "jwt"];
const PROFILE_SCOPES: &[&str] = &["", "user", "usuario", "data", "data.user", "data.usuario"];

/// Profile details optionally returned next to the token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginProfile {
    pub name: Option<String>,
    pub cargo: Option<String>,
}

fn scopes(payload: &Value) -> impl Iterator<Item = &Value> {
    PROFILE_SCOPES.iter().filter_map(move |scope| {
        if scope.is_empty() {
            Some(payload)
        } else {
            lookup(payload, scope).filter(|v| v.is_object())
        }
    })
}

/// Find the bearer token in a login response.
pub fn extract_login_token(payload: &Value) -> Option<String> {
    scopes(payload).find_map(|scope| {
        TOKEN_KEYS
            .iter()
            .find_map(|key| scope.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

/// Find the display name and position in a login response.
pub fn extract_profile(payload: &Value) -> LoginProfile {
    let name = scopes(payload).find_map(|s| first_text(s, &["name", "nombre", "fullName"]));
    let cargo = scopes(payload).find_map(|s| first_text(s, &["cargo", "position", "puesto"]));
    LoginProfile { name, cargo }
}
