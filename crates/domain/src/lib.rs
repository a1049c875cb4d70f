//! # Actasti Domain
//!
//! Business domain types and models for the Actasti asset-custody client.
//!
//! This crate contains:
//! - Inventory, user, store and acta data types
//! - Session model and its validity rules
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other Actasti crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
