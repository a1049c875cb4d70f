//! Dashboard statistics, passed through as opaque JSON.

use std::sync::Arc;

use actasti_domain::constants::DASHBOARD_STATS_PATH;
use actasti_domain::{DashboardFilter, Result};
use serde_json::Value;
use tracing::instrument;

use crate::api::ApiClient;

pub struct DashboardService {
    client: Arc<ApiClient>,
}

impl DashboardService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns the mapped API error.
    #[instrument(skip(self))]
    pub async fn stats(&self, filter: &DashboardFilter) -> Result<Value> {
        Ok(self.client.get_json(DASHBOARD_STATS_PATH, &filter.query_pairs()).await?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::{ApiClientConfig, SessionStore};

    #[tokio::test]
    async fn filter_is_sent_as_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/dashboard/stats"))
            .and(query_param("tiendaId", "3"))
            .and(query_param("estados", "Asignado"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "asignados": 7 })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = ApiClientConfig {
            base_url: format!("{}/api/v1", mock_server.uri()),
            ..Default::default()
        };
        let client = Arc::new(ApiClient::new(config, Arc::new(SessionStore::new())).unwrap());
        let service = DashboardService::new(client);

        let filter = DashboardFilter { tienda_id: Some(3), estados: vec!["Asignado".into()] };
        assert_eq!(service.stats(&filter).await.unwrap()["asignados"], 7);
    }
}
