//! Storage error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Username already enrolled
    #[error("user already exists: {username}")]
    UserExists {
        /// Username that collided
        username: String,
    },

    /// Backend cannot serve requests (lock poisoned, connection lost, etc.)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
