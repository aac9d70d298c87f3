//! Final response header composition.
//!
//! # Responsibilities
//! - Merge projected source headers, the cache-control lowest common
//!   denominator, and the gateway's static overrides
//! - Apply the composed set onto the outbound HTTP response headers
//!
//! # Design Decisions
//! - The cache-control entry is always present in the composed map and
//!   computed over the full unfiltered collected set; the sink skips
//!   empty values so an empty merge never reaches the wire
//! - Gateway overrides are applied last and win unconditionally

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue as HttpHeaderValue};
use indexmap::IndexMap;

use super::mapped::MappedHeader;
use crate::cachecontrol::lowest_common_denominator;
use crate::config::ResponseHeaderConfig;

/// A composed header value: a single set-once value, or an ordered
/// list applied as distinct header occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Single(String),
    Multi(Vec<String>),
}

/// Merge the projected source headers, the computed cache-control
/// lowest common denominator, and the gateway override headers into
/// the final set to emit.
pub fn compose_response_headers(
    response_config: Option<&ResponseHeaderConfig>,
    projected: IndexMap<String, Vec<String>>,
    collected: &[MappedHeader],
) -> IndexMap<String, HeaderValue> {
    let mut composed: IndexMap<String, HeaderValue> = projected
        .into_iter()
        .map(|(name, values)| (name, HeaderValue::Multi(values)))
        .collect();

    composed.insert(
        "cache-control".to_string(),
        HeaderValue::Single(lowest_common_denominator(collected)),
    );

    if let Some(config) = response_config {
        for (name, value) in config.override_headers() {
            composed.insert(
                name.to_ascii_lowercase(),
                HeaderValue::Single(value.to_ascii_lowercase()),
            );
        }
    }

    composed
}

/// Apply a composed header set onto an HTTP header map.
///
/// List values append one occurrence per non-empty element (multiple
/// set-cookie lines); single values replace any existing value. Empty
/// values, and names or values that are not valid HTTP, are skipped.
pub fn apply_headers(headers: &mut HeaderMap, composed: IndexMap<String, HeaderValue>) {
    for (name, value) in composed {
        let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
            tracing::warn!(header = %name, "skipping invalid response header name");
            continue;
        };
        // Framing belongs to the outbound response body, never to a
        // source's echoed headers.
        if header_name == header::CONTENT_LENGTH || header_name == header::CONNECTION {
            continue;
        }
        match value {
            HeaderValue::Multi(values) => {
                for value in values {
                    if value.is_empty() {
                        continue;
                    }
                    match HttpHeaderValue::from_str(&value) {
                        Ok(value) => {
                            headers.append(header_name.clone(), value);
                        }
                        Err(_) => {
                            tracing::warn!(header = %name, "skipping invalid response header value");
                        }
                    }
                }
            }
            HeaderValue::Single(value) => {
                if value.is_empty() {
                    continue;
                }
                match HttpHeaderValue::from_str(&value) {
                    Ok(value) => {
                        headers.insert(header_name, value);
                    }
                    Err(_) => {
                        tracing::warn!(header = %name, "skipping invalid response header value");
                    }
                }
            }
        }
    }
}
