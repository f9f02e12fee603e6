//! Veilchat authentication gate.
//!
//! Login is a two-step decision. [`matches`] compares a submitted face
//! embedding against the enrolled one and answers yes or no. Only a yes lets
//! a [`SessionIssuer`] mint a bearer token for the user.
//!
//! # Fail Closed
//!
//! [`matches`] never returns an error. Bad base64, bad JSON, missing indices,
//! non-numeric values, empty vectors and length mismatches all collapse to
//! `false`. The typed [`EmbeddingError`] is still available through
//! [`face_distance`] for diagnostics, but authentication decisions must go
//! through [`matches`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod embedding;
pub mod error;
pub mod matcher;
pub mod session;

pub use embedding::{FaceEmbedding, decode_embedding, euclidean_distance};
pub use error::{EmbeddingError, SessionError};
pub use matcher::{MATCH_THRESHOLD, face_distance, matches};
pub use session::{
    DEFAULT_TOKEN_TTL_SECS, JwtSessionIssuer, SessionClaims, SessionIssuer, SessionToken,
};
