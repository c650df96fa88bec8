//! Error handling for the access-control engine
//!
//! This module defines all error types used throughout the crate. Ordinary access
//! narrowing (mode downgrades, mutation denials) is never an error: those are values.
//! What remains here are configuration mistakes, collaborator failures and invalid input.

use thiserror::Error;

/// Result type alias for the access-control engine
pub type Result<T> = std::result::Result<T, AccessError>;

/// Main error type for the access-control engine
#[derive(Error, Debug)]
pub enum AccessError {
    /// Configuration errors (unregistered entity type, invalid policy file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A collaborator (directory, ownership store, executor) could not supply data
    #[error("Upstream data unavailable from {source_name}: {message}")]
    Upstream {
        /// Collaborator that failed
        source_name: &'static str,
        /// Failure detail
        message: String,
    },

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Helper functions for creating specific errors
impl AccessError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    pub fn upstream<S: Into<String>>(source_name: &'static str, message: S) -> Self {
        Self::Upstream {
            source_name,
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the failure came from a data collaborator rather than from the caller.
    ///
    /// Upstream failures must fail closed: list queries degrade to an empty filter and
    /// mutations are denied.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Database(_))
    }

    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Upstream { .. } => "UPSTREAM_UNAVAILABLE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
