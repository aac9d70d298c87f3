//! Request helpers.

use axum::http::request::Parts;

/// Request header toggling metadata mode.
pub const INCLUDE_METADATA_HEADER: &str = "x-include-metadata";

/// Query parameter toggling metadata mode.
pub const INCLUDE_METADATA_PARAM: &str = "includeMetadata";

/// Whether all source headers (prefixed) should surface for this
/// request, bypassing the per-source allow-lists.
pub fn should_include_metadata(parts: &Parts) -> bool {
    let from_header = parts
        .headers
        .get(INCLUDE_METADATA_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(is_enabled)
        .unwrap_or(false);
    if from_header {
        return true;
    }

    parts
        .uri
        .query()
        .map(|query| {
            query.split('&').any(|pair| {
                pair.split_once('=')
                    .is_some_and(|(key, value)| key == INCLUDE_METADATA_PARAM && is_enabled(value))
            })
        })
        .unwrap_or(false)
}

fn is_enabled(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_header_enables_metadata_mode() {
        assert!(should_include_metadata(&parts("/", &[("x-include-metadata", "true")])));
        assert!(should_include_metadata(&parts("/", &[("x-include-metadata", "1")])));
        assert!(!should_include_metadata(&parts("/", &[("x-include-metadata", "no")])));
    }

    #[test]
    fn test_query_parameter_enables_metadata_mode() {
        assert!(should_include_metadata(&parts("/?includeMetadata=true", &[])));
        assert!(should_include_metadata(&parts("/?a=b&includeMetadata=1", &[])));
        assert!(!should_include_metadata(&parts("/?includeMetadata=false", &[])));
        assert!(!should_include_metadata(&parts("/?includemetadata=true", &[])));
    }

    #[test]
    fn test_default_is_off() {
        assert!(!should_include_metadata(&parts("/", &[])));
    }
}
