//! Service error types.
//!
//! Provides strongly-typed errors for account and messaging operations and
//! their mapping onto the client-visible responses of an HTTP front end:
//! - Input validation (username, face encoding)
//! - Authentication (login, bearer token)
//! - Message confidentiality (envelope decryption)
//! - Backend failures (storage, token signing)

use thiserror::Error;
use veilchat_auth::SessionError;
use veilchat_crypto::DecryptError;

use crate::storage::StorageError;

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Username fails length rules.
    #[error("invalid username: {reason}")]
    InvalidUsername {
        /// Which rule was violated
        reason: &'static str,
    },

    /// Face encoding is empty or cannot be decoded as an embedding.
    ///
    /// Only raised at registration. Login never reports why a face was
    /// rejected.
    #[error("invalid face encoding")]
    InvalidFaceEncoding,

    /// Username is already enrolled.
    #[error("username already exists: {0}")]
    UsernameTaken(String),

    /// Login refused.
    ///
    /// Covers both unknown usernames and face mismatches so callers cannot
    /// probe which accounts exist.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bearer token missing, malformed, forged or expired.
    #[error("invalid token: {0}")]
    InvalidToken(SessionError),

    /// Message addressed to a username that is not enrolled.
    #[error("unknown recipient: {0}")]
    UnknownRecipient(String),

    /// Stored envelope could not be decrypted.
    ///
    /// Distinct from authentication failures: the caller is authenticated,
    /// the data is not readable.
    #[error("message {message_id}: {source}")]
    Decryption {
        /// Message whose envelope failed
        message_id: u64,
        /// Underlying decryption failure
        source: DecryptError,
    },

    /// Session token could not be minted.
    #[error("session issuance failed: {0}")]
    Session(SessionError),

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// HTTP status an HTTP front end should answer with.
    pub fn status(&self) -> u16 {
        match self {
            Self::UsernameTaken(_) => 400,
            Self::InvalidCredentials | Self::InvalidToken(_) => 401,
            Self::UnknownRecipient(_) => 404,
            Self::InvalidUsername { .. } | Self::InvalidFaceEncoding | Self::Decryption { .. } => {
                422
            },
            Self::Session(_) | Self::Storage(_) => 500,
        }
    }

    /// Client-safe detail message.
    ///
    /// Never includes token contents, storage internals or the reason a face
    /// was rejected.
    pub fn detail(&self) -> &'static str {
        match self {
            Self::InvalidUsername { .. } => "Invalid username",
            Self::InvalidFaceEncoding => "Invalid face encoding",
            Self::UsernameTaken(_) => "Username already exists",
            Self::InvalidCredentials => "Invalid credentials",
            Self::InvalidToken(_) => "Invalid token",
            Self::UnknownRecipient(_) => "Recipient not found",
            Self::Decryption { .. } => "Message decryption failed",
            Self::Session(_) | Self::Storage(_) => "Internal server error",
        }
    }
}
