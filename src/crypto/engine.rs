use rand::rngs::OsRng;
use rsa::pkcs1::{self, DecodeRsaPrivateKey, der::Decode};
use rsa::pkcs8::SubjectPublicKeyInfoRef;
use rsa::{BigUint, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::crypto::KeyLength;
use crate::error::{Error, Result};
use crate::format::PemBlock;

/// Encrypts `plain` with PKCS#1 v1.5 padding under a PEM public key.
///
/// `plain` must be at most the modulus size minus 11 bytes; longer input is
/// rejected by the RSA primitive as [`Error::EncryptionFailed`].
pub fn encrypt(plain: &[u8], public_pem: &str) -> Result<Vec<u8>> {
    let block = PemBlock::decode(public_pem).map_err(|_| Error::KeyConvertFailed)?;
    let key = parse_public_key(block.contents())?;

    key.encrypt(&mut OsRng, Pkcs1v15Encrypt, plain)
        .map_err(Error::EncryptionFailed)
}

/// Decrypts PKCS#1 v1.5 ciphertext with a PEM PKCS#1 private key.
///
/// Every failure of the decryption step itself is reported as the same
/// [`Error::DecryptionFailed`].
pub fn decrypt(cipher: &[u8], private_pem: &str) -> Result<Zeroizing<Vec<u8>>> {
    let block = PemBlock::decode(private_pem).map_err(|_| Error::PemDecodeFailed)?;
    let key = parse_private_key(block.contents())?;

    key.decrypt_blinded(&mut OsRng, Pkcs1v15Encrypt, cipher)
        .map(Zeroizing::new)
        .map_err(|_| Error::DecryptionFailed)
}

fn parse_public_key(der: &[u8]) -> Result<RsaPublicKey> {
    let spki = SubjectPublicKeyInfoRef::from_der(der).map_err(|_| Error::X509ParseFailed)?;

    // rsaEncryption only
    if spki.algorithm.oid != pkcs1::ALGORITHM_OID {
        return Err(Error::X509ParseFailed);
    }

    let key = pkcs1::RsaPublicKey::from_der(spki.subject_public_key.raw_bytes())
        .map_err(|_| Error::X509ParseFailed)?;
    let n = BigUint::from_bytes_be(key.modulus.as_bytes());
    let e = BigUint::from_bytes_be(key.public_exponent.as_bytes());

    // RsaPublicKey::new stops at 4096 bits
    RsaPublicKey::new_with_max_size(n, e, KeyLength::Bits15360.bits())
        .map_err(|_| Error::X509ParseFailed)
}

fn parse_private_key(der: &[u8]) -> Result<RsaPrivateKey> {
    let key = RsaPrivateKey::from_pkcs1_der(der).map_err(|_| Error::X509DecodeFailed)?;
    key.validate().map_err(|_| Error::X509DecodeFailed)?;
    Ok(key)
}
