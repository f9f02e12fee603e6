//! Service configuration.
//!
//! Built by the binary from command-line flags with environment fallbacks
//! (`VEILCHAT_SECRET_KEY`, `VEILCHAT_TOKEN_TTL_SECS`).

use std::fmt;

use thiserror::Error;
use veilchat_auth::{DEFAULT_TOKEN_TTL_SECS, JwtSessionIssuer};

use crate::env::Environment;

/// Minimum token signing secret length in bytes (HS256 key size)
pub const MIN_SECRET_LEN: usize = 32;

/// Configuration errors. Fatal at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Signing secret is too short to be a safe HS256 key
    #[error("token secret too short: need at least {min} bytes, got {actual}")]
    SecretTooShort {
        /// Required length
        min: usize,
        /// Provided length
        actual: usize,
    },

    /// Tokens would expire immediately
    #[error("token lifetime must be greater than zero")]
    ZeroTtl,
}

/// Runtime configuration for the messaging service.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    token_secret: String,
    token_ttl_secs: u64,
}

impl ServiceConfig {
    /// Validate and build a configuration.
    pub fn new(token_secret: impl Into<String>, token_ttl_secs: u64) -> Result<Self, ConfigError> {
        let token_secret = token_secret.into();

        if token_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort {
                min: MIN_SECRET_LEN,
                actual: token_secret.len(),
            });
        }

        if token_ttl_secs == 0 {
            return Err(ConfigError::ZeroTtl);
        }

        Ok(Self { token_secret, token_ttl_secs })
    }

    /// Configuration with a random, process-local signing secret.
    ///
    /// Tokens do not survive a restart. Intended for demos and tests.
    pub fn ephemeral<E: Environment>(env: &E) -> Self {
        let mut secret = [0u8; MIN_SECRET_LEN];
        env.random_bytes(&mut secret);

        Self { token_secret: hex::encode(secret), token_ttl_secs: DEFAULT_TOKEN_TTL_SECS }
    }

    /// Session token lifetime in seconds.
    pub fn token_ttl_secs(&self) -> u64 {
        self.token_ttl_secs
    }

    /// Build the session issuer for this configuration.
    pub fn session_issuer(&self) -> JwtSessionIssuer {
        JwtSessionIssuer::new(self.token_secret.as_bytes(), self.token_ttl_secs)
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}
