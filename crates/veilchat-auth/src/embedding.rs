//! Face embedding wire format
//!
//! An embedding travels as base64 of UTF-8 JSON in one of two shapes:
//!
//! ```text
//! [0.12, -0.03, ...]                  sequence
//! {"0": 0.12, "1": -0.03, ...}        index map (browser Float32Array)
//! ```
//!
//! Both normalize to the same ordered `f32` vector.

use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;

use crate::error::EmbeddingError;

/// A parsed, not yet normalized, face embedding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FaceEmbedding {
    /// JSON array of numbers
    Sequence(Vec<f64>),
    /// JSON object keyed by decimal indices `"0".."n-1"`
    IndexMap(HashMap<String, f64>),
}

impl FaceEmbedding {
    /// Parse the JSON form.
    pub fn from_json(json: &str) -> Result<Self, EmbeddingError> {
        serde_json::from_str(json).map_err(|e| EmbeddingError::Json(e.to_string()))
    }

    /// Normalize to an ordered `f32` vector.
    ///
    /// The index map must contain exactly the keys `"0".."n-1"` in canonical
    /// decimal form (`"01"` does not count as index 1).
    ///
    /// # Errors
    ///
    /// - `MissingIndex`: index map has a gap
    /// - `Empty`: no components
    /// - `NonFinite`: a component overflows `f32`
    pub fn into_vector(self) -> Result<Vec<f32>, EmbeddingError> {
        let values = match self {
            Self::Sequence(values) => values,
            Self::IndexMap(mut entries) => {
                let len = entries.len();
                (0..len)
                    .map(|index| {
                        entries
                            .remove(&index.to_string())
                            .ok_or(EmbeddingError::MissingIndex { index })
                    })
                    .collect::<Result<Vec<_>, _>>()?
            },
        };

        if values.is_empty() {
            return Err(EmbeddingError::Empty);
        }

        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let value = value as f32;
                if value.is_finite() { Ok(value) } else { Err(EmbeddingError::NonFinite { index }) }
            })
            .collect()
    }
}

/// Decode base64 transport text into a normalized embedding vector.
///
/// # Errors
///
/// - `Base64`: text is not standard base64
/// - `Utf8`: decoded bytes are not UTF-8
/// - `Json`: neither a number array nor an index-keyed object
/// - Any [`FaceEmbedding::into_vector`] error
pub fn decode_embedding(encoded: &str) -> Result<Vec<f32>, EmbeddingError> {
    let raw = STANDARD.decode(encoded).map_err(|e| EmbeddingError::Base64(e.to_string()))?;
    let json = std::str::from_utf8(&raw).map_err(|_| EmbeddingError::Utf8)?;

    FaceEmbedding::from_json(json)?.into_vector()
}

/// Euclidean distance `sqrt(sum((a_i - b_i)^2))` in `f32`.
///
/// # Errors
///
/// - `LengthMismatch`: vectors differ in dimension
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::LengthMismatch { left: a.len(), right: b.len() });
    }

    let sum_sq: f32 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    Ok(sum_sq.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(json: &str) -> String {
        STANDARD.encode(json)
    }

    #[test]
    fn sequence_form_decodes() {
        let vector = decode_embedding(&encode("[0.5, -1.25, 3]")).unwrap();
        assert_eq!(vector, vec![0.5, -1.25, 3.0]);
    }

    #[test]
    fn index_map_form_decodes_in_index_order() {
        let vector = decode_embedding(&encode(r#"{"2": 3, "0": 0.5, "1": -1.25}"#)).unwrap();
        assert_eq!(vector, vec![0.5, -1.25, 3.0]);
    }

    #[test]
    fn index_map_beyond_nine_orders_numerically() {
        let json = format!(
            "{{{}}}",
            (0..12).map(|i| format!("\"{i}\": {i}")).collect::<Vec<_>>().join(", ")
        );
        let vector = decode_embedding(&encode(&json)).unwrap();

        assert_eq!(vector, (0..12).map(|i| i as f32).collect::<Vec<_>>());
    }

    #[test]
    fn index_map_with_gap_fails() {
        let result = decode_embedding(&encode(r#"{"0": 1, "2": 2}"#));
        assert_eq!(result, Err(EmbeddingError::MissingIndex { index: 1 }));
    }

    #[test]
    fn index_map_with_non_canonical_key_fails() {
        let result = decode_embedding(&encode(r#"{"0": 1, "01": 2}"#));
        assert_eq!(result, Err(EmbeddingError::MissingIndex { index: 1 }));
    }

    #[test]
    fn index_map_with_named_key_fails() {
        let result = decode_embedding(&encode(r#"{"x": 1}"#));
        assert_eq!(result, Err(EmbeddingError::MissingIndex { index: 0 }));
    }

    #[test]
    fn non_numeric_values_fail() {
        assert!(matches!(decode_embedding(&encode(r#"[1, "a"]"#)), Err(EmbeddingError::Json(_))));
        let result = decode_embedding(&encode(r#"{"0": null}"#));
        assert!(matches!(result, Err(EmbeddingError::Json(_))));
        assert!(matches!(decode_embedding(&encode("[[1, 2]]")), Err(EmbeddingError::Json(_))));
        assert!(matches!(decode_embedding(&encode("42")), Err(EmbeddingError::Json(_))));
    }

    #[test]
    fn empty_embeddings_fail() {
        assert_eq!(decode_embedding(&encode("[]")), Err(EmbeddingError::Empty));
        assert_eq!(decode_embedding(&encode("{}")), Err(EmbeddingError::Empty));
    }

    #[test]
    fn values_beyond_f32_range_fail() {
        let result = decode_embedding(&encode("[1e300]"));
        assert_eq!(result, Err(EmbeddingError::NonFinite { index: 0 }));
    }

    #[test]
    fn bad_base64_fails() {
        assert!(matches!(decode_embedding("%%%not-base64"), Err(EmbeddingError::Base64(_))));
    }

    #[test]
    fn non_utf8_payload_fails() {
        let encoded = STANDARD.encode([0xFF, 0xFE, 0x5B]);
        assert_eq!(decode_embedding(&encoded), Err(EmbeddingError::Utf8));
    }

    #[test]
    fn distance_of_identical_vectors_is_zero() {
        let v = [0.1, 0.2, 0.3];
        assert_eq!(euclidean_distance(&v, &v).unwrap(), 0.0);
    }

    #[test]
    fn distance_three_four_five() {
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 5.0);
    }

    #[test]
    fn distance_length_mismatch_fails() {
        let result = euclidean_distance(&[0.0, 0.0], &[0.0]);
        assert_eq!(result, Err(EmbeddingError::LengthMismatch { left: 2, right: 1 }));
    }
}
