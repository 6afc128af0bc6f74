//! Error types for Agentry

use thiserror::Error;

/// Core error type for Agentry operations
#[derive(Error, Debug)]
pub enum AgentryError {
    #[error("Construction error: {0}")]
    Construction(String),

    #[error("Release error: {0}")]
    Release(String),

    #[error("Close error: {0}")]
    Close(String),

    #[error("Pool is closed")]
    PoolClosed,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for Agentry operations
pub type Result<T> = std::result::Result<T, AgentryError>;
