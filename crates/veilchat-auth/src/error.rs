//! Error types for embedding decoding and session tokens

use thiserror::Error;

/// Reasons an encoded embedding cannot take part in a comparison.
///
/// These never escape [`crate::matches`]; they exist for diagnostics and
/// tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmbeddingError {
    /// Transport text is not valid base64
    #[error("invalid base64: {0}")]
    Base64(String),

    /// Decoded bytes are not UTF-8
    #[error("embedding is not UTF-8")]
    Utf8,

    /// Not a JSON array of numbers or an index-keyed object of numbers
    #[error("invalid embedding JSON: {0}")]
    Json(String),

    /// Index-keyed form is missing a key in `0..n`
    #[error("embedding index {index} missing")]
    MissingIndex {
        /// First index not present as a decimal key
        index: usize,
    },

    /// Embedding has no components
    #[error("embedding is empty")]
    Empty,

    /// Component does not fit a finite `f32`
    #[error("embedding component {index} is not finite")]
    NonFinite {
        /// Position of the offending component
        index: usize,
    },

    /// Embeddings have different dimensions
    #[error("embedding length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Dimension of the submitted embedding
        left: usize,
        /// Dimension of the stored embedding
        right: usize,
    },
}

/// Errors from session token issuance and verification
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Token could not be signed
    #[error("token signing failed: {0}")]
    Signing(String),

    /// Token is malformed, has a bad signature, or lacks required claims
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Token lifetime has ended
    #[error("token expired at {expired_at}")]
    Expired {
        /// Expiry timestamp (Unix seconds)
        expired_at: u64,
    },

    /// Subject identity is empty
    #[error("token subject is empty")]
    EmptySubject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_error_display() {
        assert!(EmbeddingError::MissingIndex { index: 3 }.to_string().contains('3'));

        let msg = EmbeddingError::LengthMismatch { left: 128, right: 64 }.to_string();
        assert!(msg.contains("128"));
        assert!(msg.contains("64"));
    }

    #[test]
    fn session_error_display() {
        let msg = SessionError::Expired { expired_at: 1_700_000_000 }.to_string();
        assert!(msg.contains("expired"));
        assert!(msg.contains("1700000000"));

        assert!(SessionError::Invalid("bad signature".to_string())
            .to_string()
            .contains("bad signature"));
    }
}
