//! Error types for the SWIFT message processor

use thiserror::Error;

/// Result type alias for processor operations
pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {

    // =============================
    // Core Pipeline Errors
    // =============================

    #[error("Correction error: {0}")]
    CorrectionError(String),

    #[error("Audit error: {0}")]
    AuditError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
