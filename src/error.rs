//! Error types for studyplan
//!
//! Centralized error handling using thiserror. The planning engine itself is
//! total; these errors come from the completion collaborator and the store.

use thiserror::Error;

/// All error types that can occur in studyplan
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Plan document not found in storage
    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    /// Planning entry not found in a schedule
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Caller supplied something the engine cannot act on
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for studyplan operations
pub type Result<T> = std::result::Result<T, PlannerError>;
