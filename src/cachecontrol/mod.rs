//! Cache-control reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! collected source cache-control values
//!     → directives.rs (parse mini-grammar → DirectiveMap)
//!     → merge.rs (left-fold lowest common denominator across sources)
//!     → directives.rs (serialize canonical header value)
//! ```
//!
//! # Design Decisions
//! - Parse failure is silent; a malformed header contributes nothing
//! - The merge runs over every collected header, independent of the
//!   per-source allow-lists
//! - Deterministic for a fixed fold order; order-independent except
//!   that no-store anywhere collapses the whole result

pub mod directives;
pub mod merge;

pub use directives::{parse_directives, serialize_directives, DirectiveMap};
pub use merge::{lowest_common_denominator, resolve_directives};
