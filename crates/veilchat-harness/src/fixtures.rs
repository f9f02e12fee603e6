//! Face embedding fixtures.
//!
//! Embeddings are 128-dimension descriptors with components in `[-0.1, 0.1]`,
//! the scale typical face-descriptor models produce. Distinct seeds give
//! embeddings far apart (distance well above the match threshold);
//! [`recapture`] gives a nearby one.

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Descriptor dimension
pub const EMBEDDING_DIM: usize = 128;

/// A deterministic face embedding for `seed`.
pub fn face_embedding(seed: u64) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..EMBEDDING_DIM).map(|_| rng.gen_range(-0.1f32..0.1)).collect()
}

/// Shift every component by `delta`, simulating a fresh capture.
///
/// The resulting distance is `|delta| * sqrt(dim)`.
pub fn recapture(embedding: &[f32], delta: f32) -> Vec<f32> {
    embedding.iter().map(|v| v + delta).collect()
}

/// Encode as base64 of a JSON array.
pub fn encode_sequence(embedding: &[f32]) -> String {
    let widened: Vec<f64> = embedding.iter().map(|&v| f64::from(v)).collect();
    STANDARD.encode(serde_json::Value::from(widened).to_string())
}

/// Encode as base64 of a JSON object keyed `"0".."n-1"`.
pub fn encode_index_map(embedding: &[f32]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = embedding
        .iter()
        .enumerate()
        .map(|(i, &v)| (i.to_string(), serde_json::Value::from(f64::from(v))))
        .collect();

    STANDARD.encode(serde_json::Value::Object(map).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeddings_are_deterministic() {
        assert_eq!(face_embedding(7), face_embedding(7));
        assert_ne!(face_embedding(7), face_embedding(8));
    }

    #[test]
    fn embedding_has_expected_shape() {
        let embedding = face_embedding(1);

        assert_eq!(embedding.len(), EMBEDDING_DIM);
        assert!(embedding.iter().all(|v| (-0.1..0.1).contains(v)));
    }

    #[test]
    fn encodings_are_base64_json() {
        let embedding = vec![0.5, -0.25];

        let sequence = STANDARD.decode(encode_sequence(&embedding)).unwrap();
        assert_eq!(String::from_utf8(sequence).unwrap(), "[0.5,-0.25]");

        let map = STANDARD.decode(encode_index_map(&embedding)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&map).unwrap();
        assert_eq!(value, serde_json::json!({"0": 0.5, "1": -0.25}));
    }
}
