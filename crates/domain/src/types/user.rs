//! User types
//!
//! Responsible users resolved from the backend directory.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric user identifier, accepted as a JSON number or numeric string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Parse a JSON value into an id. Only non-negative integers and
    /// all-digit strings qualify.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(number) => number.as_u64().map(|n| Self(n.to_string())),
            serde_json::Value::String(text) => Self::parse(text),
            _ => None,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory user that can be made responsible for an acta
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub cargo: Option<String>,
    pub correo: Option<String>,
    pub role: Option<String>,
}

impl User {
    /// Exact username match, trimmed and case-insensitive.
    pub fn has_username(&self, expected: &str) -> bool {
        self.username.trim().eq_ignore_ascii_case(expected.trim())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ids_accept_numbers_and_numeric_strings() {
        assert_eq!(UserId::from_json(&json!(42)).unwrap().as_str(), "42");
        assert_eq!(UserId::from_json(&json!(" 1017 ")).unwrap().as_str(), "1017");
        assert!(UserId::from_json(&json!("abc")).is_none());
        assert!(UserId::from_json(&json!(-3)).is_none());
        assert!(UserId::from_json(&json!(null)).is_none());
    }

    #[test]
    fn username_match_is_exact_not_prefix() {
        let user = User {
            id: UserId::parse("1").unwrap(),
            name: "Ana".into(),
            username: "ABC".into(),
            cargo: None,
            correo: None,
            role: None,
        };
        assert!(user.has_username(" abc "));
        assert!(!user.has_username("abc01"));
    }
}
