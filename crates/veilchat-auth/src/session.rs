//! Session credentials minted after a successful face match
//!
//! The core only decides *whether* a session may be issued. Token format and
//! signing live behind [`SessionIssuer`] so deployments can swap them.
//! [`JwtSessionIssuer`] is the default: HS256 JWTs carrying the username as
//! `sub`, valid for 24 hours.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Default session lifetime (24 hours)
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Token type reported to clients
const BEARER: &str = "bearer";

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject identity (username)
    pub sub: String,
    /// Issued-at (Unix seconds)
    pub iat: u64,
    /// Expiry (Unix seconds)
    pub exp: u64,
}

/// A minted bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionToken {
    /// Opaque signed token
    pub access_token: String,
    /// Always `"bearer"`
    pub token_type: String,
    /// Expiry (Unix seconds)
    pub expires_at: u64,
}

/// Mints and checks session credentials.
///
/// Callers supply the current time so issuance and expiry are deterministic
/// under test.
///
/// # Invariants
///
/// - `issue` must only be called after [`crate::matches`] returned `true`
/// - `verify(issue(s, t).access_token, t')` returns subject `s` for every
///   `t' < t + ttl`
pub trait SessionIssuer: Send + Sync {
    /// Mint a credential for `subject`.
    fn issue(&self, subject: &str, now_secs: u64) -> Result<SessionToken, SessionError>;

    /// Check a credential and return its claims.
    fn verify(&self, token: &str, now_secs: u64) -> Result<SessionClaims, SessionError>;
}

/// HS256 JWT session issuer.
#[derive(Clone)]
pub struct JwtSessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl JwtSessionIssuer {
    /// Create an issuer signing with `secret`.
    ///
    /// Secret length policy is enforced by configuration, not here.
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `verify`
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);
        validation
    }
}

impl fmt::Debug for JwtSessionIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSessionIssuer")
            .field("secret", &"[REDACTED]")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl SessionIssuer for JwtSessionIssuer {
    fn issue(&self, subject: &str, now_secs: u64) -> Result<SessionToken, SessionError> {
        if subject.is_empty() {
            return Err(SessionError::EmptySubject);
        }

        let claims = SessionClaims {
            sub: subject.to_string(),
            iat: now_secs,
            exp: now_secs.saturating_add(self.ttl_secs),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::Signing(e.to_string()))?;

        tracing::debug!(subject, expires_at = claims.exp, "issued session token");

        Ok(SessionToken { access_token, token_type: BEARER.to_string(), expires_at: claims.exp })
    }

    fn verify(&self, token: &str, now_secs: u64) -> Result<SessionClaims, SessionError> {
        let claims = decode::<SessionClaims>(token, &self.decoding, &Self::validation())
            .map_err(|e| SessionError::Invalid(e.to_string()))?
            .claims;

        if claims.sub.is_empty() {
            return Err(SessionError::EmptySubject);
        }

        if now_secs >= claims.exp {
            return Err(SessionError::Expired { expired_at: claims.exp });
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-with-at-least-32-bytes!!";
    const NOW: u64 = 1_700_000_000;

    fn issuer() -> JwtSessionIssuer {
        JwtSessionIssuer::new(SECRET, DEFAULT_TOKEN_TTL_SECS)
    }

    #[test]
    fn issue_then_verify() {
        let issuer = issuer();
        let token = issuer.issue("alice", NOW).unwrap();

        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.expires_at, NOW + DEFAULT_TOKEN_TTL_SECS);

        let claims = issuer.verify(&token.access_token, NOW + 60).unwrap();
        assert_eq!(claims, SessionClaims {
            sub: "alice".to_string(),
            iat: NOW,
            exp: NOW + DEFAULT_TOKEN_TTL_SECS
        });
    }

    #[test]
    fn token_is_three_part_jwt() {
        let token = issuer().issue("alice", NOW).unwrap();
        assert_eq!(token.access_token.split('.').count(), 3);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = issuer();
        let token = issuer.issue("alice", NOW).unwrap();

        let at_expiry = issuer.verify(&token.access_token, NOW + DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(
            at_expiry,
            Err(SessionError::Expired { expired_at: NOW + DEFAULT_TOKEN_TTL_SECS })
        );

        let just_before = issuer.verify(&token.access_token, NOW + DEFAULT_TOKEN_TTL_SECS - 1);
        assert!(just_before.is_ok());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = JwtSessionIssuer::new(b"another-secret-of-sufficient-size!!!", 60)
            .issue("alice", NOW)
            .unwrap();

        assert!(matches!(issuer().verify(&token.access_token, NOW), Err(SessionError::Invalid(_))));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let issuer = issuer();
        let token = issuer.issue("alice", NOW).unwrap().access_token;

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_claims = issuer.issue("mallory", NOW).unwrap().access_token;
        let forged_payload = forged_claims.split('.').nth(1).unwrap();
        parts[1] = forged_payload;

        assert!(matches!(issuer.verify(&parts.join("."), NOW), Err(SessionError::Invalid(_))));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(issuer().verify("not-a-token", NOW), Err(SessionError::Invalid(_))));
        assert!(matches!(issuer().verify("", NOW), Err(SessionError::Invalid(_))));
    }

    #[test]
    fn empty_subject_is_refused() {
        assert_eq!(issuer().issue("", NOW), Err(SessionError::EmptySubject));
    }

    #[test]
    fn debug_hides_secret() {
        let debug = format!("{:?}", issuer());
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("test-secret"));
    }
}
