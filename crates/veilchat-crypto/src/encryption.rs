//! Message envelope encryption using AES-256-CBC
//!
//! Envelope layout: `IV (16 bytes) ‖ ciphertext`, base64 (standard alphabet,
//! padded) for transport. Plaintext is zero padded to the block size. No
//! padding block is added when the plaintext is already aligned.

use aes::{
    Aes256,
    cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::NoPadding},
};
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{derivation::SymmetricKey, error::DecryptError};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Initialization vector size in bytes (one AES block)
pub const IV_SIZE: usize = 16;

/// A decoded envelope: initialization vector followed by ciphertext.
///
/// # Invariants
///
/// - `ciphertext.len()` is a multiple of [`BLOCK_SIZE`]
/// - Serialized length is at least [`IV_SIZE`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    iv: [u8; IV_SIZE],
    ciphertext: Vec<u8>,
}

impl EncryptedEnvelope {
    /// Initialization vector for this envelope.
    pub fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }

    /// Block-aligned ciphertext.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Serialize to `IV ‖ ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(IV_SIZE + self.ciphertext.len());
        bytes.extend_from_slice(&self.iv);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Parse `IV ‖ ciphertext`.
    ///
    /// # Errors
    ///
    /// - `Truncated`: fewer than [`IV_SIZE`] bytes
    /// - `Misaligned`: ciphertext is not block aligned
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecryptError> {
        let Some((iv, ciphertext)) = data.split_first_chunk::<IV_SIZE>() else {
            return Err(DecryptError::Truncated { expected: IV_SIZE, actual: data.len() });
        };

        if ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(DecryptError::Misaligned {
                len: ciphertext.len(),
                block_size: BLOCK_SIZE,
            });
        }

        Ok(Self { iv: *iv, ciphertext: ciphertext.to_vec() })
    }

    /// Base64 text form used on the wire and in storage.
    pub fn encode(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Parse the base64 text form.
    ///
    /// # Errors
    ///
    /// - `Encoding`: text is not standard base64
    /// - Any [`EncryptedEnvelope::from_bytes`] error
    pub fn decode(text: &str) -> Result<Self, DecryptError> {
        let raw = STANDARD
            .decode(text)
            .map_err(|e| DecryptError::Encoding { reason: e.to_string() })?;
        Self::from_bytes(&raw)
    }
}

/// Encrypt `plaintext` under `key` with a fresh random IV.
///
/// Returns the base64 envelope text. The IV comes from the OS CSPRNG, so two
/// encryptions of the same message differ.
///
/// # Panics
///
/// Panics if the OS RNG fails.
#[allow(clippy::expect_used)]
pub fn encrypt(plaintext: &str, key: &SymmetricKey) -> String {
    let mut iv = [0u8; IV_SIZE];
    getrandom::fill(&mut iv).expect("invariant: OS RNG failure is unrecoverable");

    encrypt_with_iv(plaintext, key, iv)
}

/// Encrypt `plaintext` under `key` with a caller-provided IV.
///
/// Pure function. Production callers go through [`encrypt`]; this exists for
/// deterministic tests and known-answer vectors. Reusing an IV under the same
/// key leaks equality of message prefixes.
pub fn encrypt_with_iv(plaintext: &str, key: &SymmetricKey, iv: [u8; IV_SIZE]) -> String {
    let padded = zero_pad(plaintext.as_bytes());
    let ciphertext = Aes256CbcEnc::new(key.as_bytes().into(), &iv.into())
        .encrypt_padded_vec_mut::<NoPadding>(&padded);

    EncryptedEnvelope { iv, ciphertext }.encode()
}

/// Decrypt base64 envelope text under `key`.
///
/// Trailing zero bytes are stripped from the decrypted buffer before UTF-8
/// decoding, so plaintexts that legitimately end in NUL come back shorter.
///
/// # Errors
///
/// - `Encoding`: envelope text is not base64
/// - `Truncated`: envelope shorter than the IV
/// - `Misaligned`: ciphertext is not block aligned
/// - `InvalidUtf8`: wrong key, tampering, or non-text payload
pub fn decrypt(envelope: &str, key: &SymmetricKey) -> Result<String, DecryptError> {
    let envelope = EncryptedEnvelope::decode(envelope)?;

    let mut plaintext = Aes256CbcDec::new(key.as_bytes().into(), &envelope.iv.into())
        .decrypt_padded_vec_mut::<NoPadding>(&envelope.ciphertext)
        .map_err(|_| DecryptError::Misaligned {
            len: envelope.ciphertext.len(),
            block_size: BLOCK_SIZE,
        })?;

    let unpadded_len = plaintext.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    plaintext.truncate(unpadded_len);

    String::from_utf8(plaintext).map_err(|_| DecryptError::InvalidUtf8)
}

/// Pad with zero bytes to the next multiple of [`BLOCK_SIZE`].
///
/// Aligned input (including empty input) gets no padding.
fn zero_pad(data: &[u8]) -> Vec<u8> {
    let padded_len = data.len().next_multiple_of(BLOCK_SIZE);
    let mut padded = Vec::with_capacity(padded_len);
    padded.extend_from_slice(data);
    padded.resize(padded_len, 0);
    padded
}
