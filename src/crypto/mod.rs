//! RSA primitives: key pair generation and PKCS#1 v1.5 encryption.

pub mod engine;
pub mod keygen;

pub use engine::{decrypt, encrypt};
pub use keygen::{KeyLength, KeyPair};

/// Key pairs shared by tests; generating RSA keys is slow.
#[cfg(test)]
pub(crate) mod test_keys {
    use std::sync::OnceLock;

    use super::{KeyLength, KeyPair};

    pub fn primary() -> &'static KeyPair {
        static KEYS: OnceLock<KeyPair> = OnceLock::new();
        KEYS.get_or_init(|| KeyPair::generate(KeyLength::Bits3072).unwrap())
    }

    pub fn secondary() -> &'static KeyPair {
        static KEYS: OnceLock<KeyPair> = OnceLock::new();
        KEYS.get_or_init(|| KeyPair::generate(KeyLength::Bits3072).unwrap())
    }
}
