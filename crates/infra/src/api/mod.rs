//! Backend API access
//!
//! [`ApiClient`] is the only component that talks to the backend. It decorates
//! every request through the authorization attachment, maps statuses to
//! [`ApiError`], and hands JSON or bytes back to the services.

pub mod auth;
pub mod client;
pub mod errors;

pub use auth::{AuthService, SessionProvider, SessionStore};
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use errors::ApiError;
