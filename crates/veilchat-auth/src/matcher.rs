//! Login gate: does the submitted face match the enrolled one?

use crate::{
    embedding::{decode_embedding, euclidean_distance},
    error::EmbeddingError,
};

/// Distance below which two embeddings belong to the same face.
///
/// Comparison is strict: a distance of exactly `0.6` is a mismatch.
pub const MATCH_THRESHOLD: f32 = 0.6;

/// Distance between two encoded embeddings.
///
/// Diagnostic companion to [`matches`]. Authentication decisions must not be
/// built on this directly.
pub fn face_distance(submitted: &str, stored: &str) -> Result<f32, EmbeddingError> {
    let submitted = decode_embedding(submitted)?;
    let stored = decode_embedding(stored)?;

    euclidean_distance(&submitted, &stored)
}

/// Whether `submitted` and `stored` encode the same face.
///
/// Returns `true` only when both decode cleanly, have the same dimension and
/// their Euclidean distance is below [`MATCH_THRESHOLD`]. Every failure is
/// `false`.
pub fn matches(submitted: &str, stored: &str) -> bool {
    match face_distance(submitted, stored) {
        Ok(distance) => {
            let accepted = distance < MATCH_THRESHOLD;
            tracing::debug!(distance, accepted, "face comparison");
            accepted
        },
        Err(e) => {
            tracing::debug!(error = %e, "face comparison rejected");
            false
        },
    }
}
