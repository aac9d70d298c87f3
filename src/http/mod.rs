//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! client request
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (metadata-mode detection)
//!     → fan-out fetch to every configured source
//!     → headers subsystem (collect → project → compose)
//!     → aggregate response to client
//! ```

pub mod request;
pub mod server;

pub use request::should_include_metadata;
pub use server::GatewayServer;
