use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard errors: anything that aborts the resolution of a whole property.
///
/// Unclassifiable or badly shaped owner strings are NOT errors; they are
/// recorded as [`crate::domain::InvalidOwnerEntry`] values instead.
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Missing property identifier")]
    MissingPropertyId,

    #[error("Malformed source at {path}: {message}")]
    MalformedSource { path: String, message: String },

    #[error("Unknown source profile: {0}")]
    UnknownSource(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResolverError {
    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        ResolverError::MalformedSource {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable label, used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            ResolverError::MissingPropertyId => "missing_property_id",
            ResolverError::MalformedSource { .. } => "malformed_source",
            ResolverError::UnknownSource(_) => "unknown_source",
            ResolverError::Config(_) => "config",
            ResolverError::Json(_) => "json",
            ResolverError::Toml(_) => "toml",
            ResolverError::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;

/// Structured error object surfaced for a property whose run was aborted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub path: String,
}

impl ErrorReport {
    /// Build the report for an error raised while reading `input_path`.
    /// Errors that already carry a location inside the document keep it.
    pub fn from_error(err: &ResolverError, input_path: &str) -> Self {
        let path = match err {
            ResolverError::MalformedSource { path, .. } => format!("{}#{}", input_path, path),
            _ => input_path.to_string(),
        };

        Self {
            kind: "error".to_string(),
            message: err.to_string(),
            path,
        }
    }
}
