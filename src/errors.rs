//! Unified error type for the garden tracker.
//!
//! Expected domain outcomes (a plant that is missing or belongs to someone else,
//! a reminder that was already deleted) are not errors: the core returns `Option`,
//! `bool` or a dedicated enum for those. This type only carries input the core
//! refuses to store and infrastructure failures the caller has to surface.

use thiserror::Error;

/// Errors produced by configuration, the core services and the HTTP layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// An input value was rejected before it reached the database.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field, as the client sent it
        field: &'static str,
        /// Human-readable explanation
        message: String,
    },

    /// Any failure reported by `SeaORM` or the underlying driver.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure (photo storage, config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
