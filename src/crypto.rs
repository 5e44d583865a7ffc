//! RSA key material exchanged between the starter and its clients.
//!
//! Keys travel as hex strings of the unsigned big-endian modulus and public
//! exponent. Ciphertexts are PKCS#1 v1.5 blocks, hex encoded as well.

use rand::rngs::OsRng;
use regex::Regex;
use rsa::{traits::PublicKeyParts, BigUint, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;
use utoipa::ToSchema;

/// Key size handed out by the starter unless configured otherwise.
pub const DEFAULT_KEY_BITS: usize = 2048;
pub const MIN_KEY_BITS: usize = 1024;
/// Largest modulus accepted by `RsaPublicKey::new`.
pub const MAX_KEY_BITS: usize = 4096;

#[allow(clippy::unwrap_used)]
static HEX_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]+$").unwrap());

#[derive(Debug, Error)]
pub enum Error {
    #[error("empty {0}")]
    Empty(&'static str),
    #[error("invalid hex in {0}")]
    Hex(&'static str),
    #[error("ciphertext is longer than the key modulus")]
    CiphertextTooLong,
    #[error("password is not valid UTF-8")]
    Utf8,
    #[error("rsa: {0}")]
    Rsa(#[from] rsa::Error),
}

/// Public half of a one-shot key, as served by `GET /key`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    /// Hex encoded modulus
    pub modulus: String,
    /// Hex encoded public exponent
    pub exponent: String,
}

impl PublicKey {
    #[must_use]
    pub fn from_rsa(key: &RsaPublicKey) -> Self {
        Self {
            modulus: hex::encode(key.n().to_bytes_be()),
            exponent: hex::encode(key.e().to_bytes_be()),
        }
    }

    /// Build an encryption key from the hex fields.
    ///
    /// # Errors
    /// Returns an error if a field is empty, is not hex, or the RSA library
    /// refuses the resulting key.
    pub fn to_rsa(&self) -> Result<RsaPublicKey, Error> {
        let n = BigUint::from_bytes_be(&decode_hex(&self.modulus, "modulus")?);
        let e = BigUint::from_bytes_be(&decode_hex(&self.exponent, "exponent")?);

        Ok(RsaPublicKey::new(n, e)?)
    }
}

#[must_use]
pub fn valid_hex(value: &str) -> bool {
    HEX_REGEX.is_match(value)
}

fn decode_hex(value: &str, field: &'static str) -> Result<Vec<u8>, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::Empty(field));
    }

    if !valid_hex(value) {
        return Err(Error::Hex(field));
    }

    // odd length means the leading zero nibble was dropped
    let decoded = if value.len() % 2 == 1 {
        hex::decode(format!("0{value}"))
    } else {
        hex::decode(value)
    };

    decoded.map_err(|_| Error::Hex(field))
}

/// Generate a new private key of `bits` size.
///
/// # Errors
/// Returns an error if the RSA library fails to generate the key.
pub fn generate(bits: usize) -> Result<RsaPrivateKey, Error> {
    Ok(RsaPrivateKey::new(&mut OsRng, bits)?)
}

/// Encrypt `plaintext` with PKCS#1 v1.5 padding and return lowercase hex.
///
/// # Errors
/// Returns an error if the message is too long for the key.
pub fn encrypt(key: &RsaPublicKey, plaintext: &str) -> Result<String, Error> {
    let ciphertext = key.encrypt(&mut OsRng, Pkcs1v15Encrypt, plaintext.as_bytes())?;

    Ok(hex::encode(ciphertext))
}

/// Decrypt a hex ciphertext produced by [`encrypt`] or any PKCS#1 v1.5 encoder.
///
/// Ciphertexts whose leading zero bytes were stripped are padded back to the
/// modulus size; a sign byte in front of a full-size block is tolerated.
///
/// # Errors
/// Returns an error on malformed hex, a ciphertext larger than the modulus, a
/// decryption failure, or a plaintext that is not UTF-8.
pub fn decrypt(key: &RsaPrivateKey, ciphertext: &str) -> Result<SecretString, Error> {
    let bytes = decode_hex(ciphertext, "ciphertext")?;
    let size = key.size();

    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    let significant = &bytes[leading_zeros.min(bytes.len().saturating_sub(size))..];
    if significant.len() > size {
        return Err(Error::CiphertextTooLong);
    }

    let mut block = vec![0u8; size - significant.len()];
    block.extend_from_slice(significant);

    let plaintext = key.decrypt(Pkcs1v15Encrypt, &block)?;
    let password = String::from_utf8(plaintext).map_err(|_| Error::Utf8)?;

    Ok(SecretString::from(password))
}
