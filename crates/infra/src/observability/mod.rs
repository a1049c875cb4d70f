//! Observability infrastructure
//!
//! Structured logging through `tracing`. Every component logs with
//! structured fields; this module only installs the global subscriber.

pub mod logging;

pub use logging::{build_filter, init_tracing};
