//! Veilchat Cryptographic Primitives
//!
//! The two message-confidentiality building blocks used by veilchat: a
//! deterministic per-pair key derivation and a symmetric envelope codec.
//!
//! # Key Lifecycle
//!
//! Keys are never stored or transmitted. Every encrypt or decrypt call
//! re-derives the key from the ordered identity pair of the message.
//!
//! ```text
//! (sender, recipient)
//!        │
//!        ▼
//! SHA-256(sender ":" recipient) → SymmetricKey (32 bytes)
//!        │
//!        ▼
//! AES-256-CBC, random IV, zero padding
//!        │
//!        ▼
//! base64(IV ‖ ciphertext) → envelope text
//! ```
//!
//! # Known Weaknesses
//!
//! These are behavioral contracts of the deployed format and are kept as-is:
//!
//! - Derivation is order sensitive: `(alice, bob)` and `(bob, alice)` yield
//!   different keys. Callers must derive with the order the message was
//!   encrypted under.
//! - The `:` separator is not escaped, so `("a:b", "c")` and `("a", "b:c")`
//!   share a key.
//! - Zero padding is stripped greedily on decrypt, so plaintexts that end in
//!   NUL bytes lose them.
//! - CBC without a MAC gives confidentiality only. Tampering is detected only
//!   if it happens to break UTF-8 decoding.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod derivation;
pub mod encryption;
pub mod error;

pub use derivation::{KEY_SIZE, SymmetricKey, derive_pair_key};
pub use encryption::{BLOCK_SIZE, EncryptedEnvelope, IV_SIZE, decrypt, encrypt, encrypt_with_iv};
pub use error::DecryptError;
