//! Key derivation and key material.

use crate::error::{CryptoError, CryptoResult};
use crate::secret::Credential;
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a derived or random key in bytes (256-bit).
pub const KEY_SIZE: usize = 32;

/// Size of a key-derivation salt in bytes.
pub const SALT_SIZE: usize = 16;

/// Argon2id cost parameters.
///
/// Memory is expressed in KiB. Values below the Argon2 floor of
/// `8 * parallelism` KiB are raised to that floor at derivation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    /// Minimal cost parameters. Only for tests; offers no brute-force resistance.
    pub fn testing() -> Self {
        Self {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn to_argon2(self) -> CryptoResult<Params> {
        let parallelism = self.parallelism.max(1);
        let memory = self.memory_kib.max(parallelism.saturating_mul(8));
        Params::new(memory, self.iterations.max(1), parallelism, Some(KEY_SIZE))
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))
    }
}

/// Random salt mixed into key derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Builds a salt from a stored slice, rejecting the wrong length.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let arr: [u8; SALT_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: SALT_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// A 256-bit symmetric key. Zeroed when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derives a key from the credential with Argon2id.
pub fn derive_key(
    credential: &Credential,
    salt: &Salt,
    params: &KdfParams,
) -> CryptoResult<DerivedKey> {
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

    let mut out = [0u8; KEY_SIZE];
    let result = argon.hash_password_into(credential.expose_secret(), salt.as_bytes(), &mut out);
    if let Err(e) = result {
        out.zeroize();
        return Err(CryptoError::KeyDerivation(e.to_string()));
    }

    let key = DerivedKey::from_bytes(out);
    out.zeroize();
    Ok(key)
}

/// Generates a random key (not derived from any credential).
pub fn generate_random_key() -> DerivedKey {
    let mut bytes = [0u8; KEY_SIZE];
    rand::rng().fill_bytes(&mut bytes);
    let key = DerivedKey::from_bytes(bytes);
    bytes.zeroize();
    key
}
