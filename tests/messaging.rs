use std::fs;
use std::sync::OnceLock;

use rsa_courier::{
    Error, KeyLength, KeyPair, KeyStore, LoadStatus, decrypt_message, encrypt_message,
};
use tempfile::tempdir;

const PLAINTEXT: &str = "Hello this is a test message with runes♡♡♡♡";

fn keys() -> &'static KeyPair {
    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| KeyPair::generate(KeyLength::Bits3072).unwrap())
}

#[test]
fn saved_keys_decrypt_after_reload() {
    let dir = tempdir().unwrap();
    let store = KeyStore::new(dir.path().join("testCerts").join("testKey"));
    store.save(keys()).unwrap();

    let (loaded, status) = store.load();
    assert_eq!(status, LoadStatus::Complete);
    let loaded = loaded.into_key_pair().unwrap();
    assert_eq!(loaded.public_key(), keys().public_key());
    assert_eq!(loaded.private_key(), keys().private_key());

    let sealed = encrypt_message(PLAINTEXT, loaded.public_key()).unwrap();
    assert_eq!(decrypt_message(&sealed, loaded.private_key()).unwrap(), PLAINTEXT);
}

#[test]
fn public_half_alone_can_only_encrypt() {
    let dir = tempdir().unwrap();
    let store = KeyStore::new(dir.path().join("testKey"));
    store.save(keys()).unwrap();
    fs::remove_file(store.private_path()).unwrap();

    let (loaded, status) = store.load();
    assert_eq!(status, LoadStatus::PrivateMissing);
    assert!(status.can_encrypt());
    assert!(!status.can_decrypt());

    let public = loaded.public_key().unwrap();
    let sealed = encrypt_message(PLAINTEXT, public).unwrap();
    assert_eq!(decrypt_message(&sealed, keys().private_key()).unwrap(), PLAINTEXT);
}

#[test]
fn encoded_message_layout() {
    let sealed = encrypt_message("hi", keys().public_key()).unwrap();
    let lines: Vec<&str> = sealed.lines().collect();

    assert_eq!(lines[0], "-----BEGIN ENCODED MESSAGE-----");
    assert_eq!(lines[lines.len() - 1], "-----END ENCODED MESSAGE-----");
    assert!(sealed.ends_with("-----\n"));
    // 384 byte ciphertext -> 512 base64 characters
    let body = &lines[1..lines.len() - 1];
    assert_eq!(body.len(), 13);
    assert!(body.iter().all(|l| l.len() <= 40));
    assert_eq!(body.iter().map(|l| l.len()).sum::<usize>(), 512);
}

#[test]
fn message_survives_added_comment_lines() {
    let sealed = encrypt_message(PLAINTEXT, keys().public_key()).unwrap();
    let forwarded = format!("-- forwarded message --\n{sealed}-- end --\n");

    assert_eq!(
        decrypt_message(&forwarded, keys().private_key()).unwrap(),
        PLAINTEXT
    );
}

#[test]
fn tampered_body_is_rejected() {
    let sealed = encrypt_message(PLAINTEXT, keys().public_key()).unwrap();
    // '*' is outside the base64 alphabet
    let tampered = sealed.replacen("-----\n", "-----\n*", 1);

    assert!(matches!(
        decrypt_message(&tampered, keys().private_key()),
        Err(Error::MessageDecodeFailed(_))
    ));
}

#[test]
fn invalid_key_lengths_are_rejected() {
    for bits in [-8, 0, 3000] {
        assert!(matches!(
            KeyPair::with_bits(bits),
            Err(Error::InvalidKeyLength(b)) if b == bits
        ));
    }
}

fn assert_round_trip(length: KeyLength) {
    let pair = KeyPair::generate(length).unwrap();
    let longest = "a".repeat(length.max_message_len());

    for plaintext in [PLAINTEXT, longest.as_str()] {
        let sealed = encrypt_message(plaintext, pair.public_key()).unwrap();
        assert_eq!(
            decrypt_message(&sealed, pair.private_key()).unwrap(),
            plaintext,
            "round trip with {length} key"
        );
    }
}

#[test]
#[ignore = "slow: generates a 4096 bit key"]
fn round_trip_with_4096_bit_key() {
    assert_round_trip(KeyLength::Bits4096);
}

#[test]
#[ignore = "slow: generates a 7680 bit key"]
fn round_trip_with_7680_bit_key() {
    assert_round_trip(KeyLength::Bits7680);
}

#[test]
#[ignore = "slow: generates a 15360 bit key"]
fn round_trip_with_15360_bit_key() {
    assert_round_trip(KeyLength::Bits15360);
}
