//! Error types for envelope decryption

use thiserror::Error;

/// Reasons an envelope could not be turned back into a message.
///
/// Every variant is a decryption failure from the caller's point of view and
/// displays as such. The variants exist so logs can tell a transport problem
/// from a cipher or text problem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecryptError {
    /// Envelope text is not valid base64
    #[error("decryption failed: malformed envelope encoding: {reason}")]
    Encoding {
        /// Decoder message
        reason: String,
    },

    /// Envelope is shorter than the initialization vector
    #[error("decryption failed: envelope too short: expected at least {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum envelope length
        expected: usize,
        /// Actual envelope length
        actual: usize,
    },

    /// Ciphertext length is not a whole number of cipher blocks
    #[error("decryption failed: ciphertext length {len} is not a multiple of {block_size}")]
    Misaligned {
        /// Ciphertext length in bytes
        len: usize,
        /// Cipher block size
        block_size: usize,
    },

    /// Decrypted bytes are not valid UTF-8
    #[error("decryption failed: plaintext is not valid UTF-8")]
    InvalidUtf8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_reads_as_decryption_failure() {
        let errors = [
            DecryptError::Encoding { reason: "invalid byte".to_string() },
            DecryptError::Truncated { expected: 16, actual: 3 },
            DecryptError::Misaligned { len: 17, block_size: 16 },
            DecryptError::InvalidUtf8,
        ];

        for err in errors {
            assert!(err.to_string().starts_with("decryption failed"), "{err}");
        }
    }

    #[test]
    fn misaligned_display_includes_lengths() {
        let msg = DecryptError::Misaligned { len: 33, block_size: 16 }.to_string();
        assert!(msg.contains("33"));
        assert!(msg.contains("16"));
    }
}
