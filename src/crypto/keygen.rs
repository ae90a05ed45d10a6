use std::fmt;
use std::time::Instant;

use log::debug;
use rand::rngs::OsRng;
use rsa::{RsaPrivateKey, RsaPublicKey, pkcs1::EncodeRsaPrivateKey, pkcs8::EncodePublicKey};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::format::pem::{PRIVATE_KEY_LABEL, PUBLIC_KEY_LABEL, PemBlock};

/// RSA modulus sizes accepted for key generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyLength {
    Bits512,
    Bits1024,
    Bits2048,
    #[default]
    Bits3072,
    Bits4096,
    Bits7680,
    Bits15360,
}

impl KeyLength {
    /// Every accepted length, smallest first.
    pub const ALL: [KeyLength; 7] = [
        KeyLength::Bits512,
        KeyLength::Bits1024,
        KeyLength::Bits2048,
        KeyLength::Bits3072,
        KeyLength::Bits4096,
        KeyLength::Bits7680,
        KeyLength::Bits15360,
    ];

    /// Returns the modulus size in bits.
    pub const fn bits(self) -> usize {
        match self {
            KeyLength::Bits512 => 512,
            KeyLength::Bits1024 => 1024,
            KeyLength::Bits2048 => 2048,
            KeyLength::Bits3072 => 3072,
            KeyLength::Bits4096 => 4096,
            KeyLength::Bits7680 => 7680,
            KeyLength::Bits15360 => 15360,
        }
    }

    /// Largest plaintext, in bytes, a key of this length can encrypt.
    pub const fn max_message_len(self) -> usize {
        self.bits() / 8 - 11
    }
}

impl TryFrom<i64> for KeyLength {
    type Error = Error;

    fn try_from(bits: i64) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|length| length.bits() as i64 == bits)
            .ok_or(Error::InvalidKeyLength(bits))
    }
}

impl fmt::Display for KeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// A PEM encoded RSA key pair.
///
/// The public key is a SubjectPublicKeyInfo in an `RSA Public Key` block,
/// the private key a PKCS#1 structure in an `RSA Private Key` block. The
/// private key text is wiped when the pair is dropped.
#[derive(Clone)]
pub struct KeyPair {
    public_key: String,
    private_key: Zeroizing<String>,
}

impl KeyPair {
    /// Generates a fresh key pair from the OS random source.
    ///
    /// Large lengths are slow (seconds for 4096 bits and above); callers
    /// that need to stay responsive should generate off their hot path.
    pub fn generate(length: KeyLength) -> Result<Self> {
        debug!("generating {length} RSA key pair");
        let started = Instant::now();

        let private = RsaPrivateKey::new(&mut OsRng, length.bits())
            .map_err(Error::KeyGenerationFailed)?;
        let public = RsaPublicKey::from(&private);

        let private_der = private
            .to_pkcs1_der()
            .map_err(|_| Error::KeyEncodingFailed)?;
        let public_der = public
            .to_public_key_der()
            .map_err(|_| Error::KeyEncodingFailed)?;

        let public_key = PemBlock::new(PUBLIC_KEY_LABEL, public_der.as_bytes())
            .encode()
            .map_err(|_| Error::KeyEncodingFailed)?;
        let private_key = PemBlock::new(PRIVATE_KEY_LABEL, private_der.as_bytes())
            .encode()
            .map(Zeroizing::new)
            .map_err(|_| Error::KeyEncodingFailed)?;

        let pair = Self {
            public_key,
            private_key,
        };

        debug!("generated {length} RSA key pair in {:?}", started.elapsed());
        Ok(pair)
    }

    /// Validates `bits` against [`KeyLength::ALL`] and generates a pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyLength`] without generating anything when
    /// `bits` is not an accepted length.
    pub fn with_bits(bits: i64) -> Result<Self> {
        Self::generate(KeyLength::try_from(bits)?)
    }

    pub(crate) fn from_parts(public_key: String, private_key: Zeroizing<String>) -> Self {
        Self {
            public_key,
            private_key,
        }
    }

    /// Returns the public key PEM.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Returns the private key PEM.
    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
