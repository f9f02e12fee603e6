//! Property-based tests for pair key derivation and envelope encryption
//!
//! These tests verify invariants that must hold for all inputs, not specific
//! scenarios.

use base64::{Engine, engine::general_purpose::STANDARD};
use proptest::prelude::*;
use veilchat_crypto::{
    BLOCK_SIZE, DecryptError, IV_SIZE, SymmetricKey, decrypt, derive_pair_key, encrypt,
    encrypt_with_iv,
};

/// Strings that never end in NUL, so the zero-padding strip is lossless
fn message_without_trailing_nul() -> impl Strategy<Value = String> {
    ".{0,200}".prop_filter("trailing NUL is stripped by design", |s| !s.ends_with('\0'))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: derivation is deterministic for every ordered pair
    #[test]
    fn prop_derive_is_deterministic(sender in ".*", recipient in ".*") {
        prop_assert_eq!(derive_pair_key(&sender, &recipient), derive_pair_key(&sender, &recipient));
    }

    /// Property: swapping distinct identities changes the key
    #[test]
    fn prop_derive_is_order_sensitive(sender in "[a-z]{1,16}", recipient in "[a-z]{1,16}") {
        prop_assume!(sender != recipient);
        prop_assert_ne!(derive_pair_key(&sender, &recipient), derive_pair_key(&recipient, &sender));
    }

    /// Property: decrypt inverts encrypt for text without trailing NULs
    #[test]
    fn prop_roundtrip(plaintext in message_without_trailing_nul(), key in any::<[u8; 32]>()) {
        let key = SymmetricKey::from_bytes(key);
        let envelope = encrypt(&plaintext, &key);

        prop_assert_eq!(decrypt(&envelope, &key)?, plaintext);
    }

    /// Property: envelopes are IV plus whole blocks, padded to the next block
    #[test]
    fn prop_envelope_shape(plaintext in ".{0,200}", iv in any::<[u8; IV_SIZE]>()) {
        let key = derive_pair_key("alice", "bob");
        let raw = STANDARD.decode(encrypt_with_iv(&plaintext, &key, iv))?;

        prop_assert!(raw.len() >= IV_SIZE);
        prop_assert_eq!(&raw[..IV_SIZE], &iv[..]);

        let ciphertext_len = raw.len() - IV_SIZE;
        prop_assert_eq!(ciphertext_len % BLOCK_SIZE, 0);
        prop_assert_eq!(ciphertext_len, plaintext.len().next_multiple_of(BLOCK_SIZE));
    }

    /// Property: arbitrary envelope text never panics, and misaligned raw
    /// bytes are always rejected
    #[test]
    fn prop_decrypt_arbitrary_bytes(raw in prop::collection::vec(any::<u8>(), 0..128)) {
        let key = derive_pair_key("alice", "bob");
        let result = decrypt(&STANDARD.encode(&raw), &key);

        if raw.len() < IV_SIZE {
            prop_assert!(
                matches!(result, Err(DecryptError::Truncated { .. })),
                "expected Truncated, got {:?}",
                result
            );
        } else if (raw.len() - IV_SIZE) % BLOCK_SIZE != 0 {
            prop_assert!(
                matches!(result, Err(DecryptError::Misaligned { .. })),
                "expected Misaligned, got {:?}",
                result
            );
        }
    }

    /// Property: arbitrary text input never panics
    #[test]
    fn prop_decrypt_arbitrary_text(text in ".{0,128}") {
        let key = derive_pair_key("alice", "bob");
        let _ = decrypt(&text, &key);
    }
}

#[test]
fn aligned_boundary_roundtrips_without_padding_block() {
    let key = derive_pair_key("alice", "bob");

    for blocks in 1..=4 {
        let plaintext = "A".repeat(blocks * BLOCK_SIZE);
        let envelope = encrypt(&plaintext, &key);

        assert_eq!(STANDARD.decode(&envelope).unwrap().len(), IV_SIZE + blocks * BLOCK_SIZE);
        assert_eq!(decrypt(&envelope, &key).unwrap(), plaintext);
    }
}

#[test]
fn aligned_boundary_with_trailing_nul_is_lossy() {
    let key = derive_pair_key("alice", "bob");
    let plaintext = format!("{}\0", "A".repeat(BLOCK_SIZE - 1));

    let decrypted = decrypt(&encrypt(&plaintext, &key), &key).unwrap();

    assert_ne!(decrypted, plaintext);
    assert_eq!(decrypted, "A".repeat(BLOCK_SIZE - 1));
}

#[test]
fn alice_to_bob_key_is_sha256_of_pair() {
    let key = derive_pair_key("alice", "bob");

    assert_eq!(
        hex::encode(key.as_bytes()),
        "1e2af26470aae83866fd22e2907b8d1be05975d952e4158989cbd18933bd703e"
    );
}

#[test]
fn known_answer_envelopes() {
    let key = derive_pair_key("alice", "bob");
    let iv: [u8; IV_SIZE] = core::array::from_fn(|i| i as u8);

    let hello = encrypt_with_iv("hello world", &key, iv);
    assert_eq!(hello, "AAECAwQFBgcICQoLDA0ODxhMIQz2a6RhT34pHBayaY8=");
    assert_eq!(decrypt(&hello, &key).unwrap(), "hello world");

    let aligned = encrypt_with_iv(&"A".repeat(16), &key, iv);
    assert_eq!(aligned, "AAECAwQFBgcICQoLDA0OD9ldRorfgVRHYkluho4I0Cs=");
}
