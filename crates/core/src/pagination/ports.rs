//! Port the discoverer uses to reach the inventory endpoint

use actasti_domain::Result;
use async_trait::async_trait;
use serde_json::Value;

/// One query parameter as a name/value pair
pub type QueryParam = (String, String);

/// Source of raw inventory pages
///
/// Implementations issue the base inventory request with the given query
/// parameters and return the decoded JSON body untouched.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, params: &[QueryParam]) -> Result<Value>;
}
