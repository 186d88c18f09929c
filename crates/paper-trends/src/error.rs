//! Error types for the analysis engine.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::path::PathBuf;

/// Errors from the generative-text provider clients.
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    /// HTTP transport error (connection, DNS, TLS, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider requires an API key that is not configured
    #[error("Missing API key for provider {provider} (set {env_var})")]
    MissingApiKey {
        /// Provider name
        provider: String,
        /// Environment variable that supplies the key
        env_var: String,
    },

    /// Provider answered with a non-success status
    #[error("{provider} API error ({status}): {message}")]
    Api {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Response body had no usable text
    #[error("Empty response from {provider}")]
    EmptyResponse {
        /// Provider name
        provider: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid provider configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl GenerationError {
    /// Create a missing API key error.
    #[must_use]
    pub fn missing_api_key(provider: impl Into<String>, env_var: impl Into<String>) -> Self {
        Self::MissingApiKey { provider: provider.into(), env_var: env_var.into() }
    }

    /// Create an API status error.
    #[must_use]
    pub fn api(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Api { provider: provider.into(), status, message: message.into() }
    }

    /// Create an empty response error.
    #[must_use]
    pub fn empty_response(provider: impl Into<String>) -> Self {
        Self::EmptyResponse { provider: provider.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns true if a caller could reasonably try the request again.
    ///
    /// The engine itself never retries; this is for callers wrapping a run.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Errors from the artifact store and snapshot loaders.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact key not present
    #[error("Artifact not found: {key}")]
    NotFound {
        /// Artifact key
        key: String,
    },
}

impl StoreError {
    /// Create an I/O error for a path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }
}

/// Errors that abort an analysis run.
///
/// Generation failures never show up here; they degrade the narrative instead.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    /// Persisting an artifact failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Analysis parameters are unusable
    #[error("Invalid analysis config for '{field}': {message}")]
    InvalidConfig {
        /// Offending field
        field: String,
        /// Why it was rejected
        message: String,
    },
}

impl AnalysisError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig { field: field.into(), message: message.into() }
    }
}

/// Result type alias for provider calls.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, AnalysisError>;
