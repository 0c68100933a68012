//! Application error types

use thiserror::Error;

/// Errors surfaced by the application layer
#[derive(Error, Debug)]
pub enum AppError {
    /// Rejected configuration, reported before anything starts
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Window or event loop failure
    #[error("Platform error: {0}")]
    Platform(String),

    /// GPU setup or frame failure
    #[error("Renderer error: {0}")]
    Renderer(String),
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, AppError>;
