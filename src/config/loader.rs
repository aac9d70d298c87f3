//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::MeshConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MeshConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: MeshConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let config: MeshConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.sources.is_empty());
        assert!(config.response.headers.is_empty());
        assert_eq!(config.timeouts.fetch_secs, 10);
    }

    #[test]
    fn test_full_config_parses() {
        let raw = r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [[sources]]
            name = "products"
            endpoint = "http://products.internal/graphql"
            response_headers = ["x-request-cost", "set-cookie"]

            [[sources]]
            name = "reviews"
            endpoint = "http://reviews.internal/graphql"

            [response.headers]
            x-powered-by = "mesh-gateway"

            [response.cors]
            origin = ["https://shop.example"]
            credentials = true

            [timeouts]
            fetch_secs = 3
        "#;
        let config: MeshConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].response_headers.len(), 2);
        assert!(config.sources[1].response_headers.is_empty());
        assert_eq!(
            config.response.headers.get("x-powered-by").map(String::as_str),
            Some("mesh-gateway")
        );
        assert!(config.response.cors.as_ref().unwrap().credentials);
        assert_eq!(config.timeouts.fetch_secs, 3);
        assert_eq!(config.timeouts.request_secs, 30);
    }
}
