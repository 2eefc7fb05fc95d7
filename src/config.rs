// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which document store backs the profile collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    /// Process-local store, for tests and local development.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StoreBackend::Firestore),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Invalid("STORE_BACKEND", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// The only origin allowed to make cross-origin requests
    pub client_url: String,
    /// Profile store backend
    pub store_backend: StoreBackend,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Deadline for a single storage operation
    pub store_timeout: Duration,
    /// Deadline for a whole HTTP request
    pub request_timeout: Duration,
    /// Base URL of the barcode nutrition lookup service
    pub nutrition_service_url: String,
    /// Base URL of the image food detection service
    pub detection_service_url: String,
    /// Maximum accepted image upload size in bytes
    pub max_upload_bytes: usize,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 5000,
            client_url: "http://localhost:3000".to_string(),
            store_backend: StoreBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            store_timeout: Duration::from_millis(5000),
            request_timeout: Duration::from_secs(30),
            nutrition_service_url: "http://localhost:8000".to_string(),
            detection_service_url: "http://localhost:8000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Offline configuration backed by the in-memory store.
    pub fn test_default() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let store_backend: StoreBackend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "firestore".to_string())
            .parse()?;

        let gcp_project_id = match (env::var("GCP_PROJECT_ID"), store_backend) {
            (Ok(id), _) => id,
            (Err(_), StoreBackend::Memory) => "local-dev".to_string(),
            (Err(_), StoreBackend::Firestore) => {
                return Err(ConfigError::Missing("GCP_PROJECT_ID"))
            }
        };

        let nutrition_service_url = env::var("NUTRITION_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let detection_service_url =
            env::var("DETECTION_SERVICE_URL").unwrap_or_else(|_| nutrition_service_url.clone());

        Ok(Self {
            port: parse_var("PORT", 5000)?,
            client_url: env::var("CLIENT_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            store_backend,
            gcp_project_id,
            store_timeout: Duration::from_millis(parse_var("STORE_TIMEOUT_MS", 5000)?),
            request_timeout: Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 30)?),
            nutrition_service_url: trim_base_url(nutrition_service_url),
            detection_service_url: trim_base_url(detection_service_url),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

/// Read and parse an optional variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("STORE_BACKEND", "memory");
        env::set_var("PORT", "5055");
        env::set_var("NUTRITION_SERVICE_URL", "http://nutrition.local:8000/");
        env::remove_var("DETECTION_SERVICE_URL");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.port, 5055);
        assert_eq!(config.nutrition_service_url, "http://nutrition.local:8000");
        assert_eq!(config.detection_service_url, "http://nutrition.local:8000");
        assert_eq!(config.store_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("Firestore".parse::<StoreBackend>().unwrap(), StoreBackend::Firestore);
        assert_eq!(" memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!(matches!(
            "mongo".parse::<StoreBackend>(),
            Err(ConfigError::Invalid("STORE_BACKEND", _))
        ));
    }
}
