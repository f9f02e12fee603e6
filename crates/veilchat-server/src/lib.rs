//! Veilchat service.
//!
//! Account registration, face login and encrypted direct messages, built on
//! [`veilchat_crypto`] and [`veilchat_auth`]. Transport is left to the
//! embedding application: this crate exposes a synchronous [`ChatService`]
//! that an HTTP or socket layer calls into, plus the `veilchat` command-line
//! tool.
//!
//! # Components
//!
//! - [`ChatService`]: register, login, send and read operations
//! - [`Environment`]: clock and randomness, injected ([`SystemEnv`] in
//!   production)
//! - [`Storage`]: user and message persistence ([`MemoryStorage`] provided)
//! - [`ServiceConfig`]: token secret and lifetime
//! - [`ServiceError`]: typed failures with client-visible status mapping

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
mod env;
mod error;
pub mod service;
pub mod storage;
mod system_env;

pub use config::{ConfigError, ServiceConfig};
pub use env::Environment;
pub use error::ServiceError;
pub use service::{ChatService, Message};
pub use storage::{MemoryStorage, Storage, StorageError, StoredMessage, UserRecord};
pub use system_env::SystemEnv;
