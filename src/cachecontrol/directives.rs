//! Cache-control directive grammar.
//!
//! # Responsibilities
//! - Parse a raw `Cache-Control` header value into a directive map
//! - Serialize a directive map back to canonical header form
//!
//! # Design Decisions
//! - Directive names and values are normalized to lowercase on parse
//! - A directive without a value stores its own name (flag marker)
//! - Parse failure is silent: malformed input yields an empty map

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};

/// Directive name -> value mapping, insertion-ordered.
///
/// Flag directives (e.g. `no-cache`) store their own name as the value.
pub type DirectiveMap = IndexMap<String, String>;

// One directive: optional list separator, a token name, then optionally
// `=` followed by a bare token or a quoted-string with backslash
// escapes. The token class is the HTTP one: no control characters, no
// separators, no DEL.
static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:^|\s*,\s*)([^\x00-\x20()<>@,;:\\"/\[\]?={}\x7f]+)(?:=(?:([^\x00-\x20()<>@,;:\\"/\[\]?={}\x7f]+)|"((?:[^"\\]|\\.)*)"))?"#,
    )
    .expect("directive pattern compiles")
});

/// Parse a raw cache-control header value into a directive map.
///
/// Anything left over once every directive has been extracted marks
/// the whole value as malformed, and the result is an empty map: a
/// header that cannot be parsed contributes no directives.
pub fn parse_directives(raw: &str) -> DirectiveMap {
    let mut directives = DirectiveMap::new();
    let residue = DIRECTIVE.replace_all(raw, |caps: &Captures<'_>| {
        let name = caps[1].to_ascii_lowercase();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().to_ascii_lowercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| name.clone());
        directives.insert(name, value);
        ""
    });
    if residue.is_empty() {
        directives
    } else {
        DirectiveMap::new()
    }
}

/// Render a directive map back to its canonical header value.
///
/// Flag directives serialize as the bare name, valued directives as
/// `name=value`, comma-joined without spaces in map order. Values are
/// plain tokens post-parse, so no quoting is re-applied.
pub fn serialize_directives(directives: &DirectiveMap) -> String {
    directives
        .iter()
        .map(|(name, value)| {
            if value == name {
                name.clone()
            } else {
                format!("{}={}", name, value)
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
