//! Error types for the chart generator.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for chart generation.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Warehouse connection errors (login rejected, host unreachable, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query errors (SQL rejected by the warehouse, unexpected result shape, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Chart rendering and export errors.
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration errors (invalid config file, missing credentials, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem errors while writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChartError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a render error with the given message.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Render(_) => "Render Error",
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using ChartError.
pub type Result<T> = std::result::Result<T, ChartError>;
