//! Source header projection.
//!
//! Decides which collected headers surface to the client, and in what
//! form, based on each source's allow-list and the per-request
//! metadata mode.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::mapped::MappedHeader;
use crate::config::MeshConfig;

/// Select the collected headers that propagate to the client response.
///
/// A header is eligible when metadata mode is on for the request, or
/// when its source's allow-list contains the header name
/// (case-insensitive; the source-prefixed view of an allow-listed
/// header surfaces alongside the unprefixed one). Eligible set-cookie
/// values accumulate without duplicates; any other header takes the
/// latest eligible value wholesale.
pub fn project_source_headers(
    config: &MeshConfig,
    headers: &[MappedHeader],
    include_metadata: bool,
) -> IndexMap<String, Vec<String>> {
    let mut allow_lists: HashMap<&str, Vec<String>> = HashMap::new();
    for source in &config.sources {
        allow_lists.insert(
            source.name.as_str(),
            source
                .response_headers
                .iter()
                .map(|name| name.to_ascii_lowercase())
                .collect(),
        );
    }

    let mut projected: IndexMap<String, Vec<String>> = IndexMap::new();
    for header in headers {
        let name = header.name.to_ascii_lowercase();
        if !is_eligible(&allow_lists, header, &name, include_metadata) {
            continue;
        }
        if name.ends_with("set-cookie") {
            let values = projected.entry(name).or_default();
            for value in &header.values {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
        } else {
            projected.insert(name, header.values.clone());
        }
    }

    // A stale transfer-encoding from a source breaks downstream
    // processing of the gateway response.
    projected.shift_remove("transfer-encoding");

    projected
}

fn is_eligible(
    allow_lists: &HashMap<&str, Vec<String>>,
    header: &MappedHeader,
    name: &str,
    include_metadata: bool,
) -> bool {
    if include_metadata {
        return true;
    }
    let Some(allowed) = allow_lists.get(header.source.as_str()) else {
        return false;
    };
    if allowed.iter().any(|a| a == name) {
        return true;
    }
    let prefix = format!("x-{}-", header.source.to_ascii_lowercase());
    name.strip_prefix(prefix.as_str())
        .is_some_and(|stripped| allowed.iter().any(|a| a == stripped))
}
