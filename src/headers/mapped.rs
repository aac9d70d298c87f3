//! Mapped source headers.
//!
//! Every header observed on a source response is recorded in two
//! client-facing views: a source-prefixed name (`x-{source}-{name}`)
//! and the name as emitted. Which view actually reaches the client is
//! decided later, at projection time.

/// One header observation from one source response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedHeader {
    /// Name under which the header may surface to the client
    /// (possibly source-prefixed).
    pub name: String,
    /// Name of the source that emitted the header.
    pub source: String,
    /// Observed values, in order.
    pub values: Vec<String>,
}

/// Record both client-facing views of one source header observation.
pub fn add_source_mapped_header(
    headers: &mut Vec<MappedHeader>,
    source: &str,
    name: &str,
    value: &str,
) {
    add_prefixed_mapped_header(headers, source, name, value);
    add_mapped_header(headers, source, name, value);
}

/// The source-prefixed view. cache-control is exempt: it is merged
/// across sources and never surfaced per source.
fn add_prefixed_mapped_header(
    headers: &mut Vec<MappedHeader>,
    source: &str,
    name: &str,
    value: &str,
) {
    let name = if name.eq_ignore_ascii_case("cache-control") {
        name.to_string()
    } else {
        format!("x-{}-{}", source, name)
    };
    headers.push(MappedHeader {
        name,
        source: source.to_string(),
        values: vec![value.to_string()],
    });
}

/// The as-emitted view. Access-control headers are suppressed here:
/// they must be distinct on the outbound response and come only from
/// the gateway's own response configuration, never raw from sources.
fn add_mapped_header(headers: &mut Vec<MappedHeader>, source: &str, name: &str, value: &str) {
    if name.to_ascii_lowercase().starts_with("access-control-") {
        return;
    }
    headers.push(MappedHeader {
        name: name.to_string(),
        source: source.to_string(),
        values: vec![value.to_string()],
    });
}
