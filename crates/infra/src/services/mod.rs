//! Service layer implementations.
//!
//! Services combine the API client with the resolution logic of
//! `actasti-core`: caching, endpoint probing and pagination discovery.
//! [`Services`] wires them all from one [`Config`].

pub mod actas;
pub mod dashboard;
pub mod inventory;
pub mod stores;
pub mod users;

use std::sync::Arc;

use actasti_domain::{Config, Result};

pub use actas::ActasService;
pub use dashboard::DashboardService;
pub use inventory::{ApiPageSource, InventoryCacheKey, InventoryService};
pub use stores::StoreService;
pub use users::UserService;

use crate::api::{ApiClient, ApiClientConfig, AuthService, SessionStore};

/// Every service, sharing one API client and one session store
pub struct Services {
    pub sessions: Arc<SessionStore>,
    pub client: Arc<ApiClient>,
    pub auth: AuthService,
    pub inventory: Arc<InventoryService>,
    pub users: UserService,
    pub stores: StoreService,
    pub actas: ActasService,
    pub dashboard: DashboardService,
}

impl Services {
    /// Build the service graph.
    ///
    /// # Errors
    ///
    /// Returns `Config` when the API URL or extra headers are invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let sessions = Arc::new(SessionStore::new());
        let client = Arc::new(ApiClient::new(ApiClientConfig::from(&config.api), sessions.clone())?);
        let inventory = Arc::new(InventoryService::new(Arc::clone(&client), config.pagination));

        Ok(Self {
            auth: AuthService::new(Arc::clone(&client), Arc::clone(&sessions), &config.session),
            users: UserService::new(Arc::clone(&client)),
            stores: StoreService::new(Arc::clone(&client)),
            actas: ActasService::new(Arc::clone(&client), Arc::clone(&inventory)),
            dashboard: DashboardService::new(Arc::clone(&client)),
            inventory,
            client,
            sessions,
        })
    }
}
