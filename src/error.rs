use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by key generation, key storage and message operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("message and/or key is blank")]
    BlankInput,

    #[error("invalid key length: {0} bits")]
    InvalidKeyLength(i64),

    #[error("RSA key generation failed: {0}")]
    KeyGenerationFailed(#[source] rsa::Error),

    #[error("RSA key could not be DER encoded")]
    KeyEncodingFailed,

    /// The public key text holds no usable PEM block.
    #[error("cannot convert key: PEM decoding failed")]
    KeyConvertFailed,

    #[error("public key is not a valid X.509 RSA key")]
    X509ParseFailed,

    #[error("PKCS#1 v1.5 encryption failed: {0}")]
    EncryptionFailed(#[source] rsa::Error),

    #[error("private key PEM decoding failed")]
    PemDecodeFailed,

    #[error("private key is not a valid PKCS#1 RSA key")]
    X509DecodeFailed,

    #[error("base64 decoding of message failed")]
    MessageDecodeFailed(#[source] base64::DecodeError),

    // Wrong key, corrupted ciphertext and bad padding all map here.
    #[error("message decryption failed")]
    DecryptionFailed,

    #[error("decrypted message is not valid UTF-8")]
    PlaintextNotUtf8,

    #[error("key file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine platform data directory")]
    DataDirUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;
