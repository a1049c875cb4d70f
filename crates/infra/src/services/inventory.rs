//! Inventory service with snapshot caching.
//!
//! The full inventory is assembled by the pagination discoverer and kept as
//! one cached snapshot. Searches, status lists and field lookups read that
//! snapshot.
//!
//! # Caching Strategy
//!
//! - **Read-through**: the first reader triggers discovery; concurrent
//!   readers share the same in-flight run
//! - **Write invalidation**: acta writes invalidate the snapshot so the next
//!   read rediscovers the inventory
//! - **Failures are not cached**: a failed discovery leaves the slot empty

use std::collections::HashSet;
use std::sync::Arc;

use actasti_core::{
    try_normalize_list, EndpointProber, PageSource, PaginationDiscoverer, QueryParam, RequestCache,
};
use actasti_domain::constants::{INVENTORY_PATH, MIN_LOOKUP_VALUE_LENGTH};
use actasti_domain::{ActasError, InventoryField, InventoryItem, PaginationConfig, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::api::ApiClient;

/// Cache slot of the inventory snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryCacheKey {
    Snapshot,
}

/// Inventory endpoint seen as a source of pages
pub struct ApiPageSource {
    client: Arc<ApiClient>,
}

impl ApiPageSource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for ApiPageSource {
    async fn fetch_page(&self, params: &[QueryParam]) -> Result<Value> {
        Ok(self.client.get_json(INVENTORY_PATH, params).await?)
    }
}

/// Inventory reads backed by a cached snapshot
pub struct InventoryService {
    client: Arc<ApiClient>,
    source: Arc<ApiPageSource>,
    discoverer: Arc<PaginationDiscoverer>,
    cache: RequestCache<InventoryCacheKey, Arc<Vec<InventoryItem>>>,
}

impl InventoryService {
    pub fn new(client: Arc<ApiClient>, pagination: PaginationConfig) -> Self {
        Self {
            source: Arc::new(ApiPageSource::new(Arc::clone(&client))),
            client,
            discoverer: Arc::new(PaginationDiscoverer::new(pagination)),
            cache: RequestCache::new("inventory"),
        }
    }

    /// The whole inventory, discovered once and then served from cache.
    ///
    /// # Errors
    ///
    /// Returns the failure of the initial inventory request. Failures while
    /// paging are absorbed by the discoverer.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<Arc<Vec<InventoryItem>>> {
        let source = Arc::clone(&self.source);
        let discoverer = Arc::clone(&self.discoverer);

        self.cache
            .get_or_fetch(InventoryCacheKey::Snapshot, move || async move {
                discoverer.fetch_all(source.as_ref()).await.map(Arc::new)
            })
            .await
    }

    /// Drop the cached snapshot and rediscover.
    ///
    /// # Errors
    ///
    /// Same as [`snapshot`](Self::snapshot)
    pub async fn refresh(&self) -> Result<Arc<Vec<InventoryItem>>> {
        self.invalidate();
        self.snapshot().await
    }

    pub fn invalidate(&self) {
        debug!("Invalidating inventory snapshot");
        self.cache.invalidate(&InventoryCacheKey::Snapshot);
    }

    /// Items whose model, serial or assigned user contains `term`.
    ///
    /// # Errors
    ///
    /// Same as [`snapshot`](Self::snapshot)
    pub async fn search(&self, term: &str) -> Result<Vec<InventoryItem>> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.iter().filter(|item| item.matches_term(term)).cloned().collect())
    }

    /// Distinct non-empty statuses in first-seen order.
    ///
    /// # Errors
    ///
    /// Same as [`snapshot`](Self::snapshot)
    pub async fn statuses(&self) -> Result<Vec<String>> {
        let snapshot = self.snapshot().await?;
        let mut seen = HashSet::new();

        Ok(snapshot
            .iter()
            .filter_map(|item| item.estado.as_deref().map(str::trim))
            .filter(|estado| !estado.is_empty())
            .filter(|estado| seen.insert(estado.to_string()))
            .map(str::to_string)
            .collect())
    }

    /// Look an item up by serial, placa or placaAx.
    ///
    /// Asks the field endpoint first and falls back to scanning the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for values shorter than three characters,
    /// `NotFound` when no source knows the item, or an aborting API error.
    #[instrument(skip(self), fields(field = %field))]
    pub async fn find_by_field(&self, field: InventoryField, value: &str) -> Result<InventoryItem> {
        let value = value.trim();
        if value.chars().count() < MIN_LOOKUP_VALUE_LENGTH {
            return Err(ActasError::InvalidInput(format!(
                "{field} must have at least {MIN_LOOKUP_VALUE_LENGTH} characters"
            )));
        }

        let path = format!("{INVENTORY_PATH}/{field}/{}", urlencoding::encode(value));
        let client = &self.client;

        EndpointProber::new(format!("inventory item with {field} {value}"))
            .candidate("field endpoint", move || async move {
                let payload = client.get_json(&path, &[]).await?;
                try_normalize_list::<InventoryItem>(&payload).map(Arc::new)
            })
            .candidate("inventory snapshot", || self.snapshot())
            .resolve(|items: Arc<Vec<InventoryItem>>| {
                items
                    .iter()
                    .find(|item| item.matches_field(field, value))
                    .cloned()
                    .ok_or_else(|| ActasError::ShapeMismatch(format!("no item with {field} {value}")))
            })
            .await
    }
}
