//! # Actasti Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - HTTP transport (reqwest) and bearer-credential attachment
//! - API client, session store and login
//! - Inventory, user, store, acta and dashboard services
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements the `PageSource` port defined in `actasti-core`
//! - Depends on `actasti-domain` and `actasti-core`
//! - Contains all "impure" code (network, environment, files)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod services;

// Re-export commonly used items
pub use api::{ApiClient, ApiError, AuthService, SessionProvider, SessionStore};
pub use errors::InfraError;
pub use http::{AuthorizationAttachment, HttpClient};
pub use observability::init_tracing;
pub use services::Services;
