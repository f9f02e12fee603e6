//! Deterministic test harness for veilchat.
//!
//! [`SimEnv`] implements the service [`Environment`] with a seeded RNG and a
//! manually advanced clock, so token expiry and message identifiers are
//! reproducible. The [`fixtures`] module builds face embeddings in both wire
//! shapes.
//!
//! [`Environment`]: veilchat_server::Environment

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod fixtures;
pub mod sim_env;

pub use fixtures::{encode_index_map, encode_sequence, face_embedding, recapture};
pub use sim_env::SimEnv;
