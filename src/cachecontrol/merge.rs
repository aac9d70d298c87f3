//! Lowest-common-denominator merge of cache-control directives.
//!
//! # Responsibilities
//! - Fold one source's directives into the accumulated merged policy
//! - Compute the merged cache-control value across all collected headers
//!
//! # Design Decisions
//! - `no-store` from any source is absorbing: the merged result is
//!   `no-store` alone for the rest of the fold
//! - Numeric directives merge to the minimum; flags union, first seen wins
//! - `private` drops `public` and `s-maxage` (most restrictive wins)

use super::directives::{parse_directives, serialize_directives, DirectiveMap};
use crate::headers::mapped::MappedHeader;

/// Directives whose merged value is the minimum across sources.
const MIN_DIRECTIVES: [&str; 6] = [
    "min-fresh",
    "max-age",
    "max-stale",
    "s-maxage",
    "stale-if-error",
    "stale-while-revalidate",
];

/// Flag directives unioned across sources.
const FLAG_DIRECTIVES: [&str; 8] = [
    "public",
    "private",
    "immutable",
    "no-cache",
    "no-transform",
    "must-revalidate",
    "proxy-revalidate",
    "must-understand",
];

/// Fold one source's directives into the accumulated lowest common
/// denominator.
pub fn resolve_directives(mut acc: DirectiveMap, incoming: &DirectiveMap) -> DirectiveMap {
    // Once any source says no-store, the merged policy is no-store only.
    if acc.contains_key("no-store") {
        return acc;
    }
    if incoming.contains_key("no-store") {
        acc.clear();
        acc.insert("no-store".to_string(), "no-store".to_string());
        return acc;
    }

    for name in MIN_DIRECTIVES {
        if let Some(candidate) = incoming.get(name) {
            update_to_min(&mut acc, name, candidate);
        }
    }

    for (name, value) in incoming {
        if FLAG_DIRECTIVES.contains(&name.as_str()) && !acc.contains_key(name) {
            acc.insert(name.clone(), value.clone());
        }
    }

    // private is strictly more restrictive than public, and forbids
    // shared-cache freshness.
    if acc.contains_key("private") {
        acc.shift_remove("public");
        acc.shift_remove("s-maxage");
    }

    acc
}

/// Compute the merged cache-control header value across every collected
/// `cache-control` observation. The merge runs over the full set,
/// independent of which headers are configured to surface to the client.
pub fn lowest_common_denominator(headers: &[MappedHeader]) -> String {
    let mut merged = DirectiveMap::new();
    for header in headers {
        if header.name.eq_ignore_ascii_case("cache-control") {
            let parsed = parse_directives(&header.values.join(","));
            merged = resolve_directives(merged, &parsed);
        }
    }
    serialize_directives(&merged)
}

/// Adopt `candidate` for `name` when it is lower, or more specific,
/// than the accumulated value.
fn update_to_min(acc: &mut DirectiveMap, name: &str, candidate: &str) {
    let adopt = match acc.get(name) {
        Some(current) => match (numeric(current), numeric(candidate)) {
            // A numeric candidate displaces a non-numeric value.
            (None, Some(_)) => true,
            (Some(current), Some(candidate)) => current > candidate,
            // A numeric value is never displaced by a non-numeric
            // candidate.
            _ => false,
        },
        None => true,
    };
    if adopt {
        acc.insert(name.to_string(), candidate.to_string());
    }
}

fn numeric(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge_raw(values: &[&str]) -> DirectiveMap {
        values.iter().fold(DirectiveMap::new(), |acc, raw| {
            resolve_directives(acc, &parse_directives(raw))
        })
    }

    #[test]
    fn test_no_store_collapses_everything_before_it() {
        let merged = merge_raw(&["max-age=100, public", "no-store"]);
        assert_eq!(serialize_directives(&merged), "no-store");
    }

    #[test]
    fn test_no_store_absorbs_everything_after_it() {
        let merged = merge_raw(&["no-store", "max-age=5, private, immutable"]);
        assert_eq!(serialize_directives(&merged), "no-store");
    }

    #[test]
    fn test_numeric_minimum_wins() {
        let merged = merge_raw(&["max-age=100", "max-age=50", "max-age=80"]);
        assert_eq!(merged.get("max-age").map(String::as_str), Some("50"));
    }

    #[test]
    fn test_numeric_displaces_non_numeric() {
        let mut acc = DirectiveMap::new();
        acc.insert("max-age".into(), "soon".into());
        let mut incoming = DirectiveMap::new();
        incoming.insert("max-age".into(), "30".into());
        let merged = resolve_directives(acc, &incoming);
        assert_eq!(merged.get("max-age").map(String::as_str), Some("30"));
    }

    #[test]
    fn test_non_numeric_incoming_never_displaces_numeric() {
        let mut acc = DirectiveMap::new();
        acc.insert("max-age".into(), "30".into());
        let mut incoming = DirectiveMap::new();
        incoming.insert("max-age".into(), "soon".into());
        let merged = resolve_directives(acc, &incoming);
        assert_eq!(merged.get("max-age").map(String::as_str), Some("30"));
    }

    #[test]
    fn test_flags_union_first_seen_wins() {
        let merged = merge_raw(&["no-cache", "no-transform, no-cache"]);
        assert_eq!(serialize_directives(&merged), "no-cache,no-transform");
    }

    #[test]
    fn test_private_drops_public_either_order() {
        let merged = merge_raw(&["public", "private"]);
        assert_eq!(serialize_directives(&merged), "private");
        let merged = merge_raw(&["private", "public"]);
        assert_eq!(serialize_directives(&merged), "private");
    }

    #[test]
    fn test_private_drops_s_maxage_either_order() {
        let merged = merge_raw(&["s-maxage=600", "private"]);
        assert_eq!(serialize_directives(&merged), "private");
        let merged = merge_raw(&["private", "s-maxage=600"]);
        assert_eq!(serialize_directives(&merged), "private");
    }

    #[test]
    fn test_two_source_scenario() {
        let merged = merge_raw(&["max-age=100, public", "max-age=50, private"]);
        assert_eq!(serialize_directives(&merged), "max-age=50,private");
    }

    #[test]
    fn test_malformed_source_contributes_nothing() {
        let merged = merge_raw(&["max-age=100", "garbage here", "max-age=50"]);
        assert_eq!(serialize_directives(&merged), "max-age=50");
    }

    #[test]
    fn test_lcd_over_mapped_headers_ignores_other_names() {
        let headers = vec![
            MappedHeader {
                name: "cache-control".into(),
                source: "products".into(),
                values: vec!["max-age=100".into(), "public".into()],
            },
            MappedHeader {
                name: "x-custom".into(),
                source: "products".into(),
                values: vec!["no-store".into()],
            },
            MappedHeader {
                name: "Cache-Control".into(),
                source: "reviews".into(),
                values: vec!["max-age=50, private".into()],
            },
        ];
        assert_eq!(lowest_common_denominator(&headers), "max-age=50,private");
    }

    #[test]
    fn test_lcd_with_no_cache_control_is_empty() {
        let headers = vec![MappedHeader {
            name: "x-custom".into(),
            source: "products".into(),
            values: vec!["1".into()],
        }];
        assert_eq!(lowest_common_denominator(&headers), "");
    }
}
