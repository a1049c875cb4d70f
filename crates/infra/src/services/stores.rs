//! Store (tienda) list, cached for the lifetime of the service.

use std::sync::Arc;

use actasti_core::{try_normalize_list, RequestCache};
use actasti_domain::constants::STORES_PATH;
use actasti_domain::{Result, Store};
use tracing::instrument;

use crate::api::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCacheKey {
    All,
}

pub struct StoreService {
    client: Arc<ApiClient>,
    cache: RequestCache<StoreCacheKey, Arc<Vec<Store>>>,
}

impl StoreService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client, cache: RequestCache::new("stores") }
    }

    /// All stores, fetched once.
    ///
    /// # Errors
    ///
    /// Returns the API error, or `ShapeMismatch` when the response holds no
    /// store list.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Arc<Vec<Store>>> {
        let client = Arc::clone(&self.client);
        self.cache
            .get_or_fetch(StoreCacheKey::All, move || async move {
                let payload = client.get_json(STORES_PATH, &[]).await?;
                try_normalize_list::<Store>(&payload).map(Arc::new)
            })
            .await
    }

    /// Store with the given id, if listed.
    ///
    /// # Errors
    ///
    /// Same as [`list`](Self::list)
    pub async fn find(&self, id: i64) -> Result<Option<Store>> {
        Ok(self.list().await?.iter().find(|store| store.id == id).cloned())
    }

    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}
