//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from
//! config files.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MeshConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Upstream source definitions.
    pub sources: Vec<SourceConfig>,

    /// Gateway-level response header configuration.
    pub response: ResponseHeaderConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum buffered request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// One upstream source fetched as part of resolving a gateway request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Unique source identifier; also the tag used for the
    /// source-prefixed header view (`x-{name}-...`).
    pub name: String,

    /// Source endpoint URL.
    pub endpoint: String,

    /// Header names from this source surfaced verbatim to the client
    /// (case-insensitive).
    #[serde(default)]
    pub response_headers: Vec<String>,
}

/// Gateway-level response header configuration, applied last.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResponseHeaderConfig {
    /// Static header overrides; these win over any source-derived
    /// value for the same name.
    pub headers: IndexMap<String, String>,

    /// CORS settings, rendered to access-control-* override headers.
    /// Sources' own access-control headers are never forwarded raw.
    pub cors: Option<CorsConfig>,
}

impl ResponseHeaderConfig {
    /// The effective override map: static headers plus CORS-derived
    /// access-control headers.
    pub fn override_headers(&self) -> IndexMap<String, String> {
        let mut headers = self.headers.clone();
        if let Some(cors) = &self.cors {
            for (name, value) in cors.to_headers() {
                headers.insert(name, value);
            }
        }
        headers
    }
}

/// CORS response settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins.
    pub origin: Vec<String>,

    /// Allowed methods.
    pub methods: Vec<String>,

    /// Allowed request headers.
    pub allowed_headers: Vec<String>,

    /// Response headers exposed to the caller.
    pub exposed_headers: Vec<String>,

    /// Whether credentialed requests are allowed.
    pub credentials: bool,

    /// Preflight cache lifetime in seconds.
    pub max_age: Option<u64>,
}

impl CorsConfig {
    /// Render the settings to access-control-* header pairs.
    pub fn to_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if !self.origin.is_empty() {
            headers.push((
                "access-control-allow-origin".to_string(),
                self.origin.join(", "),
            ));
        }
        if !self.methods.is_empty() {
            headers.push((
                "access-control-allow-methods".to_string(),
                self.methods.join(", "),
            ));
        }
        if !self.allowed_headers.is_empty() {
            headers.push((
                "access-control-allow-headers".to_string(),
                self.allowed_headers.join(", "),
            ));
        }
        if !self.exposed_headers.is_empty() {
            headers.push((
                "access-control-expose-headers".to_string(),
                self.exposed_headers.join(", "),
            ));
        }
        if self.credentials {
            headers.push((
                "access-control-allow-credentials".to_string(),
                "true".to_string(),
            ));
        }
        if let Some(max_age) = self.max_age {
            headers.push(("access-control-max-age".to_string(), max_age.to_string()));
        }
        headers
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Per-source fetch timeout in seconds.
    pub fetch_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            fetch_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
