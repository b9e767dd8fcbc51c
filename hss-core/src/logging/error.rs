//! Error types for the logging subsystem

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum LoggingError {
    /// A global subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),
}
