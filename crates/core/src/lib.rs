//! # Actasti Core
//!
//! Pure resolution logic - no transport dependencies.
//!
//! This crate contains:
//! - Response normalization over unknown envelope shapes
//! - Endpoint probing across candidate URL conventions
//! - Inventory pagination discovery and merging
//! - Request cache with coalescing and invalidation
//! - Authorization policy for outgoing requests
//!
//! ## Architecture Principles
//! - Only depends on `actasti-domain`
//! - No HTTP client code; the network is reached through ports (traits)
//! - Pure, testable logic

pub mod auth;
pub mod cache;
pub mod normalize;
pub mod pagination;
pub mod probe;

// Re-export specific items to avoid ambiguity
pub use auth::{normalize_bearer_token, AuthorizationPolicy};
pub use cache::{CacheState, RequestCache};
pub use normalize::{
    extract_login_token, extract_profile, normalize_envelope, normalize_list, normalize_single,
    try_normalize_list, Entity,
};
pub use pagination::{
    Discovery, MergedInventory, PageSource, PaginationDiscoverer, QueryParam, StopReason,
};
pub use probe::EndpointProber;
