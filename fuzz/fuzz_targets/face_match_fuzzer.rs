//! Fuzz target for face matching
//!
//! # Invariants
//!
//! - `matches` MUST return a bool for any pair of strings, never panic
//! - A successful match MUST imply both payloads decode to embeddings of
//!   equal length at distance below the threshold
//! - `matches` MUST be symmetric

#![no_main]

use libfuzzer_sys::fuzz_target;
use veilchat_auth::{MATCH_THRESHOLD, face_distance, matches};

fuzz_target!(|input: (String, String)| {
    let (submitted, stored) = input;

    let accepted = matches(&submitted, &stored);
    assert_eq!(accepted, matches(&stored, &submitted));

    if accepted {
        let distance = face_distance(&submitted, &stored).expect("match implies decodable");
        assert!(distance < MATCH_THRESHOLD);
    }
});
