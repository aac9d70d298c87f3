//! Response-header reconciliation gateway.
//!
//! Fans a client request out to multiple upstream sources, collects
//! every source response header, and computes a single policy-compliant
//! header set for the outbound response: per-source allow-list
//! projection plus a lowest-common-denominator cache-control merge.

pub mod cachecontrol;
pub mod config;
pub mod headers;
pub mod http;
pub mod observability;

pub use config::MeshConfig;
pub use headers::HeaderRegistry;
pub use http::GatewayServer;
