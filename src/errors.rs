//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the legal document analysis engine,
//! providing structured error types for every failure surface in the system.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from engine components and the CLI driver
//! - **Output**: Structured error types with context
//! - **Error Categories**: Input, Registry, Configuration, Io, Serialization
//!
//! ## Key Features
//! - Fatal-by-contract errors (invalid input, partial registry) surface
//!   immediately and carry no partial result
//! - Automatic conversion from I/O and parsing errors in the driver path
//! - Category accessor for structured logging
//!
//! ## Usage
//! ```rust
//! use legal_doc_analyzer::errors::{AnalyzerError, Result};
//!
//! fn check_text(text: &str) -> Result<()> {
//!     if text.contains('\u{0}') {
//!         return Err(AnalyzerError::InvalidInput {
//!             reason: "text contains NUL bytes".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Error types for the legal document analysis engine
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Input is not analyzable text (binary residue, undecoded bytes).
    /// Fatal to the analysis call; no partial result is returned.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The pattern registry failed to load or is malformed.
    /// Fatal at startup; the engine must not run on a partial registry.
    #[error("Pattern registry failed to load: {details}")]
    RegistryLoad { details: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// Generic I/O errors (driver-side file handling)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AnalyzerError {
    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            AnalyzerError::InvalidInput { .. } => "input",
            AnalyzerError::RegistryLoad { .. } => "registry",
            AnalyzerError::Config { .. } | AnalyzerError::ValidationFailed { .. } => {
                "configuration"
            }
            AnalyzerError::Io(_) => "io",
            AnalyzerError::Json(_) | AnalyzerError::Toml(_) => "serialization",
            AnalyzerError::Internal { .. } => "generic",
        }
    }

    /// Whether the error is fatal to engine startup (as opposed to a
    /// single analysis call). All analysis operations are deterministic,
    /// so nothing here is retryable.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            AnalyzerError::RegistryLoad { .. }
                | AnalyzerError::Config { .. }
                | AnalyzerError::ValidationFailed { .. }
        )
    }
}

/// Helper macro for internal errors
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::errors::AnalyzerError::Internal {
            message: $msg.to_string(),
        }
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::AnalyzerError::Internal {
            message: format!($fmt, $($arg)*),
        }
    };
}
