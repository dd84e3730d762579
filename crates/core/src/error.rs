//! Error types for ERD Studio
//!
//! This module provides unified error handling for the diagram model,
//! including lookup failures, storage errors and serialization errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for ERD Studio
#[derive(Debug, Error)]
pub enum DiagramError {
    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Entity not found
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Attribute not found on an entity
    #[error("Attribute '{attribute}' not found in entity '{entity}'")]
    AttributeNotFound { entity: String, attribute: String },

    /// A relationship endpoint does not name a known entity
    #[error("Unknown entity referenced by relationship: {0}")]
    UnknownEntity(String),

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// Stored data is present but does not parse into records
    #[error("Failed to deserialize '{key}': {message}")]
    Deserialization { key: String, message: String },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    // ========================================================================
    // Storage Errors
    // ========================================================================
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage read error
    #[error("Failed to read key '{key}': {message}")]
    StorageRead { key: String, message: String },

    /// Storage write error
    #[error("Failed to write key '{key}': {message}")]
    StorageWrite { key: String, message: String },

    /// Storage directory could not be created
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    /// Storage key is not usable by the backend
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl DiagramError {
    /// Create an entity-not-found error
    pub fn entity_not_found(id: impl Into<String>) -> Self {
        DiagramError::EntityNotFound(id.into())
    }

    /// Create an unknown-entity error
    pub fn unknown_entity(id: impl Into<String>) -> Self {
        DiagramError::UnknownEntity(id.into())
    }

    /// Create a deserialization error for a storage key
    pub fn deserialization(key: impl Into<String>, msg: impl Into<String>) -> Self {
        DiagramError::Deserialization {
            key: key.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DiagramError::Validation(msg.into())
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DiagramError::EntityNotFound(_)
                | DiagramError::AttributeNotFound { .. }
                | DiagramError::UnknownEntity(_)
        )
    }

    /// Check if this error came from decoding stored data
    pub fn is_deserialization(&self) -> bool {
        matches!(self, DiagramError::Deserialization { .. })
    }

    /// Check if this error is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            DiagramError::Io(_)
                | DiagramError::StorageRead { .. }
                | DiagramError::StorageWrite { .. }
                | DiagramError::DirectoryCreate { .. }
                | DiagramError::InvalidKey(_)
        )
    }
}

/// Result type alias using DiagramError
pub type DiagramResult<T> = Result<T, DiagramError>;

// ============================================================================
// Tests
// ============================================================================
