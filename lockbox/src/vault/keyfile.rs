//! Master key material and its on-disk layout.
//!
//! The key file holds the raw 16-byte salt immediately followed by the
//! URL-safe base64 text of the 32-byte derived key (44 bytes). It is
//! written once per initialization and overwritten wholesale on
//! re-initialization, which orphans every record sealed under the old key.

use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use rand::RngCore;
use std::io::ErrorKind;
use std::path::Path;
use zeroize::Zeroizing;

use super::kdf::SALT_SIZE;
use crate::error::{Result, VaultError};
use crate::security::VaultKey;
use crate::storage::write_private_atomic;

/// Salt plus the key derived from (master password, salt).
pub struct MasterKeyMaterial {
    pub salt: [u8; SALT_SIZE],
    pub derived_key: VaultKey,
}

impl MasterKeyMaterial {
    /// Serialize as `salt || base64url(derived_key)`.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let encoded = self.derived_key.to_encoded();
        let mut bytes = Zeroizing::new(Vec::with_capacity(SALT_SIZE + encoded.len()));
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(encoded.as_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < SALT_SIZE {
            return Err(VaultError::KeyFile(format!(
                "expected at least {} bytes, got {}",
                SALT_SIZE,
                bytes.len()
            )));
        }

        let (salt_bytes, encoded) = bytes.split_at(SALT_SIZE);
        let decoded = Zeroizing::new(
            URL_SAFE
                .decode(encoded.trim_ascii())
                .map_err(|e| VaultError::KeyFile(format!("stored key is not base64: {}", e)))?,
        );
        let derived_key = VaultKey::from_slice(&decoded).ok_or_else(|| {
            VaultError::KeyFile(format!(
                "stored key must be 32 bytes, got {}",
                decoded.len()
            ))
        })?;

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(salt_bytes);

        Ok(Self { salt, derived_key })
    }
}

/// Generate a new cryptographically secure salt.
pub fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    rand::rng().fill_bytes(&mut salt);
    salt
}

pub fn key_file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Write the key file, replacing any existing one.
pub fn write_key_file(path: &Path, material: &MasterKeyMaterial) -> Result<()> {
    write_private_atomic(path, &material.to_bytes())
}

/// Read the key file; [`VaultError::NotInitialized`] if it does not exist.
pub fn read_key_file(path: &Path) -> Result<MasterKeyMaterial> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => Zeroizing::new(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(VaultError::NotInitialized),
        Err(e) => return Err(e.into()),
    };
    MasterKeyMaterial::from_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::KEY_SIZE;

    fn material() -> MasterKeyMaterial {
        MasterKeyMaterial {
            salt: [3u8; SALT_SIZE],
            derived_key: VaultKey::from_bytes([9u8; KEY_SIZE]),
        }
    }

    #[test]
    fn test_layout_is_salt_then_44_bytes_of_text() {
        let bytes = material().to_bytes();
        assert_eq!(bytes.len(), 60);
        assert_eq!(&bytes[..SALT_SIZE], &[3u8; SALT_SIZE]);
        assert!(bytes[SALT_SIZE..].iter().all(|b| b.is_ascii_graphic()));
        assert_eq!(bytes[bytes.len() - 1], b'=');
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("encryption.key");

        write_key_file(&path, &material()).unwrap();
        assert!(key_file_exists(&path));

        let loaded = read_key_file(&path).unwrap();
        assert_eq!(loaded.salt, [3u8; SALT_SIZE]);
        assert_eq!(loaded.derived_key.as_bytes(), &[9u8; KEY_SIZE]);
    }

    #[test]
    fn test_missing_file_is_not_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("encryption.key");
        assert!(!key_file_exists(&path));
        assert!(matches!(
            read_key_file(&path),
            Err(VaultError::NotInitialized)
        ));
    }

    #[test]
    fn test_malformed_key_files() {
        assert!(matches!(
            MasterKeyMaterial::from_bytes(&[0u8; 10]),
            Err(VaultError::KeyFile(_))
        ));

        let mut not_base64 = vec![0u8; SALT_SIZE];
        not_base64.extend_from_slice(b"!!!!");
        assert!(matches!(
            MasterKeyMaterial::from_bytes(&not_base64),
            Err(VaultError::KeyFile(_))
        ));

        let mut short_key = vec![0u8; SALT_SIZE];
        short_key.extend_from_slice(URL_SAFE.encode([1u8; 16]).as_bytes());
        assert!(matches!(
            MasterKeyMaterial::from_bytes(&short_key),
            Err(VaultError::KeyFile(_))
        ));
    }

    #[test]
    fn test_salts_are_random() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
