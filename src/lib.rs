//! One-shot RSA messaging.
//!
//! Generate a [`KeyPair`], keep it on disk with a [`KeyStore`], and exchange
//! short text messages encrypted with PKCS#1 v1.5 padding and armored as
//!
//! ```text
//! -----BEGIN ENCODED MESSAGE-----
//! <base64, 40 characters per line>
//! -----END ENCODED MESSAGE-----
//! ```
//!
//! ```no_run
//! use rsa_courier::{KeyLength, KeyPair, decrypt_message, encrypt_message};
//!
//! let keys = KeyPair::generate(KeyLength::Bits3072)?;
//! let sealed = encrypt_message("meet at noon", keys.public_key())?;
//! assert_eq!(decrypt_message(&sealed, keys.private_key())?, "meet at noon");
//! # Ok::<(), rsa_courier::Error>(())
//! ```
//!
//! A message must fit in a single RSA block: at most the modulus size minus
//! 11 bytes of UTF-8 (see [`KeyLength::max_message_len`]).

pub mod crypto;
mod error;
pub mod format;
mod storage;

pub use crate::crypto::{KeyLength, KeyPair};
pub use crate::error::{Error, Result};
pub use crate::storage::{KeyStore, LoadStatus, LoadedKeys};

/// Encrypts `plaintext` under a PEM public key and returns the encoded
/// message.
///
/// # Errors
///
/// - [`Error::BlankInput`] if either argument is empty
/// - [`Error::KeyConvertFailed`] if `public_key` holds no PEM block
/// - [`Error::X509ParseFailed`] if the block is not an RSA public key
/// - [`Error::EncryptionFailed`] if the message is too long for the key
pub fn encrypt_message(plaintext: &str, public_key: &str) -> Result<String> {
    if plaintext.is_empty() || public_key.is_empty() {
        return Err(Error::BlankInput);
    }

    let cipher = crypto::encrypt(plaintext.as_bytes(), public_key)?;
    Ok(format::wrap(&cipher))
}

/// Decrypts an encoded message with a PEM private key.
///
/// # Errors
///
/// - [`Error::BlankInput`] if either argument is empty
/// - [`Error::MessageDecodeFailed`] if the message body is not base64
/// - [`Error::PemDecodeFailed`] if `private_key` holds no PEM block
/// - [`Error::X509DecodeFailed`] if the block is not a PKCS#1 RSA key
/// - [`Error::DecryptionFailed`] for any failure of decryption itself
/// - [`Error::PlaintextNotUtf8`] if the recovered message is not text
pub fn decrypt_message(encoded: &str, private_key: &str) -> Result<String> {
    if encoded.is_empty() || private_key.is_empty() {
        return Err(Error::BlankInput);
    }

    let cipher = format::unwrap(encoded)?;
    let plain = crypto::decrypt(&cipher, private_key)?;
    std::str::from_utf8(&plain)
        .map(str::to_owned)
        .map_err(|_| Error::PlaintextNotUtf8)
}
