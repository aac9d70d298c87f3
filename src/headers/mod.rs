//! Source header reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! source fetch completes
//!     → mapped.rs (two client-facing views per observation)
//!     → registry.rs (accumulate per request, keyed by request ID)
//!
//! request response composed:
//!     registry.rs (drain the request's collected set)
//!     → project.rs (allow-lists / metadata mode → surfaced headers)
//!     → compose.rs (+ cache-control LCD + gateway overrides)
//!     → compose.rs (apply onto the outbound response)
//! ```
//!
//! # Design Decisions
//! - Collection records every occurrence; deduplication is a
//!   projection concern
//! - The registry entry lives exactly as long as one request
//! - Overrides from the gateway configuration always win

pub mod compose;
pub mod mapped;
pub mod project;
pub mod registry;

pub use compose::{apply_headers, compose_response_headers, HeaderValue};
pub use mapped::{add_source_mapped_header, MappedHeader};
pub use project::project_source_headers;
pub use registry::HeaderRegistry;
