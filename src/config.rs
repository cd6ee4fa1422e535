//! # Configuration Module
//!
//! This module defines configuration structures for the recipe suggestion
//! service: generation-API settings, retry and circuit-breaker policy,
//! ingredient extraction options, and HTTP server settings.
//!
//! Collaborators receive explicit configuration values through their
//! constructors; environment variables are read only here (via the
//! `from_env` constructors) and in `main`, which keeps the match engine
//! and its tests fully hermetic.

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};

// Constants for the generation API
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

// Constants for ingredient extraction
pub const MAX_INGREDIENT_NAME_LEN: usize = 100;

// Constants for the HTTP server
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
// Must cover the worst-case generation path: per-call timeout times retries
pub const DEFAULT_SERVER_TIMEOUT_SECS: u64 = 300;
pub const MAX_BODY_BYTES: usize = 1024 * 1024; // 1MB request body limit

/// Retry policy for generation-API calls
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the initial call
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_retry_delay_ms: 1000,  // 1 second
            max_retry_delay_ms: 10000,  // 10 seconds
        }
    }
}

/// Circuit breaker settings for the generation API
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures before the circuit opens
    pub failure_threshold: u32,
    /// Time before an open circuit resets, in seconds
    pub reset_after_secs: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_after_secs: 60, // 1 minute
        }
    }
}

/// Configuration for the recipe-generation API client
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// API key for the completion endpoint
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Model name (e.g., "gpt-4")
    pub model: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Retry policy for transient failures
    pub retry: RetryConfig,
    /// Circuit breaker settings
    pub breaker: BreakerConfig,
}

impl GenerationConfig {
    /// Build the generation configuration from the environment.
    ///
    /// `OPENAI_API_KEY` is required. `OPENAI_BASE_URL` and `RECIPE_MODEL`
    /// override the defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?;
        let base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = env::var("RECIPE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            retry: RetryConfig::default(),
            breaker: BreakerConfig::default(),
        })
    }
}

/// Configuration for available-ingredient extraction
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Whether to split ingredient statements on list separators
    pub split_statements: bool,
    /// Maximum length for extracted ingredient names
    pub max_name_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            split_statements: true,
            max_name_len: MAX_INGREDIENT_NAME_LEN,
        }
    }
}

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_SERVER_TIMEOUT_SECS,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Build the server configuration from the environment.
    ///
    /// `HOST` and `PORT` override the defaults.
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            host,
            port,
            ..Self::default()
        })
    }

    /// Resolve the bind address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .context("Invalid server bind address")
    }
}
