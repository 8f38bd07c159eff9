//! Password-based key derivation.
//!
//! Transforms the master password and the vault salt into the 256-bit key
//! used for record encryption. The derivation is intentionally slow to
//! resist offline brute-force attacks.

use argon2::{Algorithm, Argon2, Params, Version};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};
use crate::security::{VaultKey, KEY_SIZE};
use crate::storage::KdfConfig;

/// Salt size in bytes (128 bits)
pub const SALT_SIZE: usize = 16;

/// Derive the vault key from `password` and `salt`.
///
/// Deterministic: the same password, salt and parameters always produce
/// the same key.
pub fn derive_key(password: &str, salt: &[u8; SALT_SIZE], kdf: &KdfConfig) -> Result<VaultKey> {
    let mut key_bytes = Zeroizing::new([0u8; KEY_SIZE]);

    match *kdf {
        KdfConfig::Pbkdf2Sha256 { iterations } => {
            if iterations == 0 {
                return Err(VaultError::KeyDerivation(
                    "PBKDF2 iterations must be greater than zero".into(),
                ));
            }
            pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut *key_bytes);
        }
        KdfConfig::Argon2id {
            memory_kib,
            time_cost,
            parallelism,
        } => {
            let params = Params::new(memory_kib, time_cost, parallelism, Some(KEY_SIZE))
                .map_err(|e| VaultError::KeyDerivation(format!("Invalid Argon2 params: {}", e)))?;

            Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                .hash_password_into(password.as_bytes(), salt, &mut *key_bytes)
                .map_err(|e| VaultError::KeyDerivation(e.to_string()))?;
        }
    }

    debug!("Derived {}-byte key from master password", KEY_SIZE);
    Ok(VaultKey::from_bytes(*key_bytes))
}
