//! Configuration module for the mention backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;

use crate::errors::AppError;

/// Default number of records pulled from each collection.
pub const DEFAULT_FETCH_SIZE: usize = 15;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Elastic Cloud deployment identifier (empty if absent)
    pub elastic_cloud_id: String,
    /// Elasticsearch basic-auth username (empty if absent)
    pub elastic_user: String,
    /// Elasticsearch basic-auth password (empty if absent)
    pub elastic_password: String,
    /// Explicit Elasticsearch endpoint, takes precedence over the cloud id
    pub elastic_url: Option<String>,
    /// Maximum number of records fetched per collection
    pub fetch_size: usize,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let elastic_cloud_id = env::var("ELASTIC_CLOUD_ID").unwrap_or_default();
        let elastic_user = env::var("ELASTIC_USER").unwrap_or_default();
        let elastic_password = env::var("ELASTIC_PASSWORD").unwrap_or_default();

        let elastic_url = env::var("ELASTIC_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let fetch_size = match env::var("MENTION_FETCH_SIZE") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid MENTION_FETCH_SIZE: {}", raw)))?,
            Err(_) => DEFAULT_FETCH_SIZE,
        };

        let bind_addr = env::var("MENTION_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = bind_addr
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid MENTION_BIND_ADDR: {}", bind_addr)))?;

        let log_level = env::var("MENTION_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            elastic_cloud_id,
            elastic_user,
            elastic_password,
            elastic_url,
            fetch_size,
            bind_addr,
            log_level,
        })
    }
}
