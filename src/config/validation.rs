//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check source name uniqueness and header-prefix safety
//! - Validate endpoint URLs and addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: MeshConfig -> Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::MeshConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("source name must not be empty")]
    EmptySourceName,

    #[error("duplicate source name: {0}")]
    DuplicateSourceName(String),

    // Source names end up in header names (`x-{name}-...`), so they
    // must stay within the token alphabet.
    #[error("source name {0:?} must contain only ASCII alphanumerics and dashes")]
    InvalidSourceName(String),

    #[error("source {0}: invalid endpoint {1:?}")]
    InvalidEndpoint(String, String),

    #[error("invalid bind address: {0:?}")]
    InvalidBindAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &MeshConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for source in &config.sources {
        if source.name.is_empty() {
            errors.push(ValidationError::EmptySourceName);
        } else {
            if !seen.insert(source.name.to_ascii_lowercase()) {
                errors.push(ValidationError::DuplicateSourceName(source.name.clone()));
            }
            if !source
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
            {
                errors.push(ValidationError::InvalidSourceName(source.name.clone()));
            }
        }
        if Url::parse(&source.endpoint).is_err() {
            errors.push(ValidationError::InvalidEndpoint(
                source.name.clone(),
                source.endpoint.clone(),
            ));
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SourceConfig;

    fn source(name: &str, endpoint: &str) -> SourceConfig {
        SourceConfig {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            response_headers: Vec::new(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&MeshConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_are_reported() {
        let mut config = MeshConfig::default();
        config.sources.push(source("products", "not a url"));
        config.sources.push(source("products", "http://ok.internal/"));
        config.listener.bind_address = "nowhere".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::InvalidEndpoint(
            "products".to_string(),
            "not a url".to_string()
        )));
        assert!(errors.contains(&ValidationError::DuplicateSourceName("products".to_string())));
        assert!(errors.contains(&ValidationError::InvalidBindAddress("nowhere".to_string())));
    }

    #[test]
    fn test_source_names_must_be_header_safe() {
        let mut config = MeshConfig::default();
        config.sources.push(source("pro ducts", "http://ok.internal/"));
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidSourceName("pro ducts".to_string())]
        );
    }

    #[test]
    fn test_duplicate_detection_is_case_insensitive() {
        let mut config = MeshConfig::default();
        config.sources.push(source("Products", "http://a.internal/"));
        config.sources.push(source("products", "http://b.internal/"));
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateSourceName("products".to_string())]
        );
    }
}
