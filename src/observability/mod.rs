//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; level from config, overridable
//!   with `RUST_LOG`
//! - Metrics are cheap (atomic increments) and exposed on a separate
//!   Prometheus scrape address

pub mod logging;
pub mod metrics;
