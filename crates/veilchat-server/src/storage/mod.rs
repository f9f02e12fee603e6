//! Storage abstraction for users and messages
//!
//! Trait-based so the service can be wired to any backend. The trait is
//! synchronous; the service performs no I/O of its own.

mod error;
mod memory;

pub use error::StorageError;
pub use memory::MemoryStorage;
use serde::{Deserialize, Serialize};

/// An enrolled account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique username
    pub username: String,
    /// Enrolled face embedding in transport form (base64 JSON)
    pub face_encoding: String,
}

/// A message as persisted: the body is an encrypted envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Random message identifier
    pub id: u64,
    /// Sending username
    pub sender: String,
    /// Receiving username
    pub recipient: String,
    /// Base64 envelope encrypted under the `(sender, recipient)` pair key
    pub envelope: String,
    /// Unix timestamp (seconds) when the message was accepted
    pub sent_at_secs: u64,
}

/// Storage abstraction for users and messages
///
/// Must be Clone (shared between handlers), Send + Sync (thread-safe), and
/// synchronous. Implementations typically share internal state via Arc, so
/// clones access the same underlying storage.
pub trait Storage: Clone + Send + Sync + 'static {
    /// Insert a new user.
    ///
    /// # Invariants
    ///
    /// - Pre: no user with the same username exists
    /// - Post: `load_user(username)` returns the record
    ///
    /// Returns `UserExists` and leaves the stored record untouched if the
    /// username is taken.
    fn create_user(&self, user: &UserRecord) -> Result<(), StorageError>;

    /// Load a user by username. `None` if not enrolled.
    fn load_user(&self, username: &str) -> Result<Option<UserRecord>, StorageError>;

    /// Append a message.
    fn store_message(&self, message: &StoredMessage) -> Result<(), StorageError>;

    /// Every message sent or received by `username`, oldest first.
    fn messages_involving(&self, username: &str) -> Result<Vec<StoredMessage>, StorageError>;
}
