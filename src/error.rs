//! Error types for the enterprise identity integration.
//!
//! Each stage of the workflow has its own error type so a caller can tell
//! exactly which stage failed: [`ValidationError`] during assembly,
//! [`AuthError`] at login, [`ConfigError`] while applying SAML settings and
//! [`PersistenceError`] when writing the document. [`IntegrationError`] wraps
//! all of them for callers that only need a single error type.

use std::path::PathBuf;

/// Top-level error for the integration workflow.
#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    /// Configuration values failed validation during assembly
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The admin endpoint refused the login
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The admin endpoint refused or did not confirm the SAML settings
    #[error("SAML configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The configuration document could not be written or read
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Operator settings could not be loaded
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Errors raised while building configuration values.
///
/// These are always produced before any network call is made, so an invalid
/// mapping never reaches the admin endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Mapping target is neither a dotted path nor a filter expression
    #[error("Invalid SCIM attribute path '{path}': {details}")]
    InvalidAttributePath { path: String, details: String },

    /// The same source field was mapped twice
    #[error("Source field '{source_field}' is mapped more than once")]
    DuplicateMappingSource { source_field: String },

    /// Source field name is empty or contains unsupported characters
    #[error("Invalid source field name '{source_field}'")]
    InvalidSourceField { source_field: String },

    /// A group mapping points at a non group-level attribute
    #[error("Attribute '{path}' is not a group-level attribute")]
    NotGroupAttribute { path: String },

    /// A required value is empty
    #[error("Required field '{field}' is empty")]
    EmptyField { field: String },

    /// A value that must be an absolute URL is not one
    #[error("Field '{field}' is not a valid URL: {value}")]
    InvalidUrl { field: String, value: String },

    /// Log retention must be at least one day
    #[error("Log retention must be a positive number of days, got {days}")]
    InvalidRetention { days: u32 },

    /// Request timeout must be at least one second
    #[error("Request timeout must be a positive number of seconds, got {secs}")]
    InvalidTimeout { secs: u64 },
}

/// Errors raised by the admin login.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The endpoint answered with a non-success status
    #[error("Admin login rejected with status {status_code}")]
    Rejected { status_code: u16 },

    /// The request never produced a response
    #[error("Admin login request failed: {reason}")]
    Transport { reason: String },

    /// The HTTP client could not be constructed
    #[error("Admin client could not be built: {reason}")]
    Client { reason: String },
}

/// Errors raised while applying SAML settings through an admin session.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No authenticated session exists
    #[error("No authenticated admin session; login must succeed first")]
    NotAuthenticated,

    /// The endpoint did not acknowledge the settings
    #[error("SAML settings rejected with status {status_code}: {reason}")]
    Rejected { status_code: u16, reason: String },

    /// The request never produced a response
    #[error("SAML settings request failed: {reason}")]
    Transport { reason: String },

    /// The read-back after applying did not match what was sent
    #[error("SAML settings were not persisted by the endpoint: {reason}")]
    VerificationFailed { reason: String },
}

impl ConfigError {
    /// Human-readable reason for the failure.
    pub fn reason(&self) -> String {
        match self {
            Self::NotAuthenticated => "no authenticated admin session".to_string(),
            Self::Rejected { reason, .. }
            | Self::Transport { reason }
            | Self::VerificationFailed { reason } => reason.clone(),
        }
    }
}

/// The document could not be written to (or read from) `path`.
#[derive(Debug, thiserror::Error)]
#[error("Failed to persist configuration at {}: {cause}", path.display())]
pub struct PersistenceError {
    pub path: PathBuf,
    #[source]
    pub cause: std::io::Error,
}

impl PersistenceError {
    pub fn new(path: impl Into<PathBuf>, cause: std::io::Error) -> Self {
        Self {
            path: path.into(),
            cause,
        }
    }
}

/// Errors raised while loading operator settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings file could not be read
    #[error("Cannot read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for the expected shape
    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required value was supplied neither in the file nor the environment
    #[error("Missing required setting '{key}' (set it in the file or via {env_var})")]
    Missing { key: String, env_var: String },

    /// A supplied value is malformed
    #[error("Invalid setting: {0}")]
    Invalid(#[from] ValidationError),
}

impl ValidationError {
    /// Create an invalid attribute path error
    pub fn invalid_path(path: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidAttributePath {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create an empty field error
    pub fn empty(field: impl Into<String>) -> Self {
        Self::EmptyField {
            field: field.into(),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport {
            reason: error.to_string(),
        }
    }
}

impl From<reqwest::Error> for ConfigError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport {
            reason: error.to_string(),
        }
    }
}

// Result type aliases for convenience
pub type IntegrationResult<T> = Result<T, IntegrationError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
