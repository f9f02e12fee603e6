//! Account and messaging service.
//!
//! [`ChatService`] wires the core primitives together:
//!
//! ```text
//! register:  validate → store UserRecord
//! login:     load user → matches(submitted, enrolled) → SessionIssuer::issue
//! send:      verify token → derive_pair_key(sender, recipient) → encrypt → store
//! read:      verify token → per message derive_pair_key(sender, recipient) → decrypt
//! ```
//!
//! All collaborators are injected at construction. The service holds no
//! global state and every method takes `&self`, so one instance can be
//! shared across request handlers.

use serde::Serialize;
use veilchat_auth::{SessionIssuer, SessionToken, decode_embedding, matches};
use veilchat_crypto::{IV_SIZE, decrypt, derive_pair_key, encrypt_with_iv};

use crate::{
    env::Environment,
    error::ServiceError,
    storage::{Storage, StorageError, StoredMessage, UserRecord},
};

/// Maximum username length in characters
pub const MAX_USERNAME_LEN: usize = 50;

/// A decrypted message as returned to its participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Message identifier
    pub id: u64,
    /// Sending username
    pub sender: String,
    /// Receiving username
    pub recipient: String,
    /// Plaintext body
    pub content: String,
    /// Unix timestamp (seconds) when the message was accepted
    pub sent_at_secs: u64,
}

/// Veilchat account and messaging service.
pub struct ChatService<E, S, I> {
    env: E,
    storage: S,
    issuer: I,
}

impl<E, S, I> ChatService<E, S, I>
where
    E: Environment,
    S: Storage,
    I: SessionIssuer,
{
    /// Create a service over the given collaborators.
    pub fn new(env: E, storage: S, issuer: I) -> Self {
        Self { env, storage, issuer }
    }

    /// Backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Enroll `username` with a face embedding.
    ///
    /// # Errors
    ///
    /// - `InvalidUsername`: empty or longer than [`MAX_USERNAME_LEN`]
    /// - `InvalidFaceEncoding`: empty or not a decodable embedding
    /// - `UsernameTaken`: already enrolled
    pub fn register(&self, username: &str, face_encoding: &str) -> Result<(), ServiceError> {
        validate_username(username)?;

        if face_encoding.is_empty() || decode_embedding(face_encoding).is_err() {
            return Err(ServiceError::InvalidFaceEncoding);
        }

        let record =
            UserRecord { username: username.to_string(), face_encoding: face_encoding.to_string() };

        match self.storage.create_user(&record) {
            Ok(()) => {
                tracing::info!(username, "user registered");
                Ok(())
            },
            Err(StorageError::UserExists { username }) => {
                Err(ServiceError::UsernameTaken(username))
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Log in with a face embedding and receive a bearer token.
    ///
    /// # Errors
    ///
    /// - `InvalidUsername`: malformed username
    /// - `InvalidCredentials`: unknown user or face mismatch (indistinguishable)
    pub fn login(&self, username: &str, face_encoding: &str) -> Result<SessionToken, ServiceError> {
        validate_username(username)?;

        let accepted = self
            .storage
            .load_user(username)?
            .is_some_and(|user| matches(face_encoding, &user.face_encoding));

        if !accepted {
            tracing::warn!(username, "login rejected");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self
            .issuer
            .issue(username, self.env.wall_clock_secs())
            .map_err(ServiceError::Session)?;

        tracing::info!(username, expires_at = token.expires_at, "login succeeded");
        Ok(token)
    }

    /// Resolve a bearer token to its username.
    pub fn authenticate(&self, token: &str) -> Result<String, ServiceError> {
        match self.issuer.verify(token, self.env.wall_clock_secs()) {
            Ok(claims) => Ok(claims.sub),
            Err(e) => {
                tracing::debug!(error = %e, "token rejected");
                Err(ServiceError::InvalidToken(e))
            },
        }
    }

    /// Encrypt and store a message from the token's user to `recipient`.
    ///
    /// The body is encrypted under `derive_pair_key(sender, recipient)` with
    /// an IV drawn from the service environment.
    ///
    /// # Errors
    ///
    /// - `InvalidToken`: bad or expired token
    /// - `UnknownRecipient`: recipient not enrolled
    pub fn send_message(
        &self,
        token: &str,
        recipient: &str,
        content: &str,
    ) -> Result<Message, ServiceError> {
        let sender = self.authenticate(token)?;

        if self.storage.load_user(recipient)?.is_none() {
            return Err(ServiceError::UnknownRecipient(recipient.to_string()));
        }

        let key = derive_pair_key(&sender, recipient);
        let mut iv = [0u8; IV_SIZE];
        self.env.random_bytes(&mut iv);

        let stored = StoredMessage {
            id: self.env.random_u64(),
            sender,
            recipient: recipient.to_string(),
            envelope: encrypt_with_iv(content, &key, iv),
            sent_at_secs: self.env.wall_clock_secs(),
        };

        self.storage.store_message(&stored)?;

        tracing::debug!(
            message_id = stored.id,
            sender = %stored.sender,
            recipient = %stored.recipient,
            "message stored"
        );

        Ok(Message {
            id: stored.id,
            sender: stored.sender,
            recipient: stored.recipient,
            content: content.to_string(),
            sent_at_secs: stored.sent_at_secs,
        })
    }

    /// Every message the token's user sent or received, decrypted, oldest
    /// first.
    ///
    /// Each envelope is decrypted with the key of its own stored
    /// `(sender, recipient)` order, so both participants read the same text.
    ///
    /// # Errors
    ///
    /// - `InvalidToken`: bad or expired token
    /// - `Decryption`: a stored envelope is unreadable. No partial list is
    ///   returned.
    pub fn messages_for(&self, token: &str) -> Result<Vec<Message>, ServiceError> {
        let username = self.authenticate(token)?;

        self.storage
            .messages_involving(&username)?
            .into_iter()
            .map(open_message)
            .collect()
    }
}

fn open_message(stored: StoredMessage) -> Result<Message, ServiceError> {
    let key = derive_pair_key(&stored.sender, &stored.recipient);

    let content = decrypt(&stored.envelope, &key).map_err(|source| {
        tracing::error!(message_id = stored.id, error = %source, "stored message unreadable");
        ServiceError::Decryption { message_id: stored.id, source }
    })?;

    Ok(Message {
        id: stored.id,
        sender: stored.sender,
        recipient: stored.recipient,
        content,
        sent_at_secs: stored.sent_at_secs,
    })
}

fn validate_username(username: &str) -> Result<(), ServiceError> {
    if username.is_empty() {
        return Err(ServiceError::InvalidUsername { reason: "must not be empty" });
    }

    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ServiceError::InvalidUsername { reason: "longer than 50 characters" });
    }

    Ok(())
}
