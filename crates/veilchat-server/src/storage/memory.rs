use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use super::{Storage, StorageError, StoredMessage, UserRecord};

/// In-memory storage implementation for tests, demos and single-process use
///
/// Uses `HashMap` for user lookups and a Vec for messages in arrival order.
/// All state is wrapped in Arc<Mutex<>> to allow Clone and concurrent access.
/// `messages_involving` is O(messages).
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryStorageInner>>,
}

#[derive(Default)]
struct MemoryStorageInner {
    /// Users keyed by username
    users: HashMap<String, UserRecord>,

    /// Messages in `store_message` order
    messages: Vec<StoredMessage>,
}

impl MemoryStorage {
    /// Create a new empty `MemoryStorage`
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of enrolled users.
    pub fn user_count(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.users.len())
    }

    /// Total number of stored messages.
    pub fn message_count(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.messages.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryStorageInner>, StorageError> {
        self.inner.lock().map_err(|_| StorageError::Unavailable("mutex poisoned".to_string()))
    }
}

impl Storage for MemoryStorage {
    fn create_user(&self, user: &UserRecord) -> Result<(), StorageError> {
        let mut inner = self.lock()?;

        if inner.users.contains_key(&user.username) {
            return Err(StorageError::UserExists { username: user.username.clone() });
        }

        inner.users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    fn load_user(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.lock()?.users.get(username).cloned())
    }

    fn store_message(&self, message: &StoredMessage) -> Result<(), StorageError> {
        self.lock()?.messages.push(message.clone());
        Ok(())
    }

    fn messages_involving(&self, username: &str) -> Result<Vec<StoredMessage>, StorageError> {
        let inner = self.lock()?;

        Ok(inner
            .messages
            .iter()
            .filter(|m| m.sender == username || m.recipient == username)
            .cloned()
            .collect())
    }
}
