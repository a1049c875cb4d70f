//! HTTP transport: reqwest client wrapper and credential attachment

pub mod authorization;
pub mod client;

pub use authorization::AuthorizationAttachment;
pub use client::{HttpClient, HttpClientBuilder};
