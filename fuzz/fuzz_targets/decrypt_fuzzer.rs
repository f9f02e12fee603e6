//! Fuzz target for envelope decryption
//!
//! # Strategy
//!
//! - Raw: arbitrary text fed straight to `decrypt`
//! - Encoded: arbitrary bytes base64-wrapped so decoding succeeds and the
//!   envelope length and cipher paths are exercised
//! - Round trip: arbitrary plaintext encrypted under a fixed IV
//!
//! # Invariants
//!
//! - `decrypt` MUST return a structured error, never panic
//! - Every error Display MUST start with "decryption failed"
//! - Plaintext without a trailing NUL MUST round-trip

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use veilchat_crypto::{IV_SIZE, decrypt, derive_pair_key, encrypt_with_iv};

#[derive(Debug, Arbitrary)]
enum Input {
    Raw(String),
    Encoded(Vec<u8>),
    RoundTrip { sender: String, recipient: String, iv: [u8; IV_SIZE], plaintext: String },
}

fn check(envelope: &str, sender: &str, recipient: &str) {
    if let Err(e) = decrypt(envelope, &derive_pair_key(sender, recipient)) {
        assert!(e.to_string().starts_with("decryption failed"));
    }
}

fuzz_target!(|input: Input| {
    match input {
        Input::Raw(text) => check(&text, "alice", "bob"),
        Input::Encoded(bytes) => {
            use base64::Engine;
            check(&base64::engine::general_purpose::STANDARD.encode(bytes), "alice", "bob");
        },
        Input::RoundTrip { sender, recipient, iv, plaintext } => {
            let key = derive_pair_key(&sender, &recipient);
            let envelope = encrypt_with_iv(&plaintext, &key, iv);
            let opened = decrypt(&envelope, &key).expect("own envelope must decrypt");

            assert_eq!(opened, plaintext.trim_end_matches('\0'));
        },
    }
});
