//! Per-pair key derivation using SHA-256

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Size of a derived symmetric key in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// Separator placed between the two identities before hashing
const PAIR_SEPARATOR: &[u8] = b":";

/// A 32-byte symmetric key for one ordered identity pair.
///
/// Derived on demand and discarded after use. The key bytes are zeroized on
/// drop and never appear in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey {
    key: [u8; KEY_SIZE],
}

impl SymmetricKey {
    /// Wrap raw key material.
    pub fn from_bytes(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Raw 32-byte key for the block cipher.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Derive the symmetric key for messages from `sender` to `recipient`.
///
/// Computes `SHA-256(sender ":" recipient)`. Total over all strings,
/// including empty ones.
///
/// # Ordering
///
/// The pair is ordered. `derive_pair_key("alice", "bob")` differs from
/// `derive_pair_key("bob", "alice")`, so a conversation uses one key per
/// direction unless callers fix the order. Decryption must use the same
/// `(sender, recipient)` order that encryption used.
///
/// # Collisions
///
/// The separator is not escaped. Identities containing `:` can collide
/// across logically different pairs, e.g. `("a:b", "c")` and `("a", "b:c")`.
pub fn derive_pair_key(sender: &str, recipient: &str) -> SymmetricKey {
    let mut hasher = Sha256::new();
    hasher.update(sender.as_bytes());
    hasher.update(PAIR_SEPARATOR);
    hasher.update(recipient.as_bytes());

    SymmetricKey { key: hasher.finalize().into() }
}
