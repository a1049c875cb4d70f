//! Inventory pagination discovery
//!
//! The inventory endpoint's paging contract is unknown: it may return
//! everything, truncate silently, or honor any of several parameter
//! conventions. This module works out which, within a fixed request budget,
//! and merges whatever it fetches into one deduplicated list.

pub mod conventions;
pub mod discoverer;
pub mod merge;
pub mod ports;

pub use conventions::{LargeLimitProbe, PageConvention};
pub use discoverer::{Discovery, PaginationDiscoverer, StopReason};
pub use merge::{merge_unique, MergedInventory};
pub use ports::{PageSource, QueryParam};
