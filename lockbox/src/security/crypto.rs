//! Field-level authenticated encryption for stored passwords.
//!
//! A token is the URL-safe base64 text of
//! `[1-byte version][8-byte issued-at, BE unix seconds][12-byte nonce][ciphertext + 16-byte tag]`.
//! The version byte and timestamp are bound as associated data, so any
//! change to the token fails authentication on open.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use chrono::{DateTime, Utc};
use rand::RngCore;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, VaultError};

/// Key size for AES-256 (256 bits = 32 bytes)
pub const KEY_SIZE: usize = 32;

/// Nonce size for AES-GCM (96 bits = 12 bytes)
const NONCE_SIZE: usize = 12;

const TAG_SIZE: usize = 16;

const TOKEN_VERSION: u8 = 0x01;

/// Version byte + timestamp.
const HEADER_SIZE: usize = 1 + 8;

/// A 256-bit encryption key with automatic zeroization on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct VaultKey {
    key: [u8; KEY_SIZE],
}

impl VaultKey {
    pub fn from_bytes(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Create a key from a slice, or `None` if it is not exactly 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != KEY_SIZE {
            return None;
        }
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(slice);
        Some(Self { key })
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    /// URL-safe base64 encoding of the key (44 characters, padded).
    pub fn to_encoded(&self) -> Zeroizing<String> {
        Zeroizing::new(URL_SAFE.encode(self.key))
    }

    /// Compare two keys without short-circuiting on the first differing byte.
    pub fn ct_eq(&self, other: &VaultKey) -> bool {
        self.key[..].ct_eq(&other.key[..]).into()
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never log the actual key material
        f.debug_struct("VaultKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// The result of opening a token.
pub struct OpenedToken {
    pub plaintext: Zeroizing<Vec<u8>>,
    pub issued_at: DateTime<Utc>,
}

impl OpenedToken {
    /// Interpret the plaintext as UTF-8.
    pub fn into_text(self) -> Result<String> {
        std::str::from_utf8(&self.plaintext)
            .map(str::to_owned)
            .map_err(|_| VaultError::Decryption("plaintext is not valid UTF-8".into()))
    }
}

/// Encrypt `plaintext` into a self-describing token stamped with the current time.
pub fn seal_token(key: &VaultKey, plaintext: &[u8]) -> Result<String> {
    seal_token_at(key, plaintext, Utc::now())
}

pub(crate) fn seal_token_at(
    key: &VaultKey,
    plaintext: &[u8],
    issued_at: DateTime<Utc>,
) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Encryption(format!("Invalid key: {}", e)))?;

    let mut header = [0u8; HEADER_SIZE];
    header[0] = TOKEN_VERSION;
    let seconds = issued_at.timestamp().max(0) as u64;
    header[1..].copy_from_slice(&seconds.to_be_bytes());

    // Generate random nonce
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|e| VaultError::Encryption(format!("Encryption failed: {}", e)))?;

    let mut raw = Vec::with_capacity(HEADER_SIZE + NONCE_SIZE + ciphertext.len());
    raw.extend_from_slice(&header);
    raw.extend_from_slice(&nonce_bytes);
    raw.extend(ciphertext);

    Ok(URL_SAFE.encode(raw))
}

/// Authenticate and decrypt a token produced by [`seal_token`].
pub fn open_token(key: &VaultKey, token: &str) -> Result<OpenedToken> {
    let raw = URL_SAFE
        .decode(token.trim())
        .map_err(|_| VaultError::Decryption("token is not valid base64".into()))?;

    if raw.len() < HEADER_SIZE + NONCE_SIZE + TAG_SIZE {
        return Err(VaultError::Decryption("token too short".into()));
    }

    if raw[0] != TOKEN_VERSION {
        return Err(VaultError::Decryption(format!(
            "unsupported token version {:#04x}",
            raw[0]
        )));
    }

    let (header, rest) = raw.split_at(HEADER_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Decryption(format!("Invalid key: {}", e)))?;

    let plaintext = cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: header,
            },
        )
        .map_err(|_| {
            // Wrong key (vault re-initialized) or corrupted token
            VaultError::Decryption("authentication failed: wrong key or corrupted token".into())
        })?;

    let mut seconds = [0u8; 8];
    seconds.copy_from_slice(&header[1..]);
    let issued_at = i64::try_from(u64::from_be_bytes(seconds))
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .ok_or_else(|| VaultError::Decryption("invalid token timestamp".into()))?;

    Ok(OpenedToken {
        plaintext: Zeroizing::new(plaintext),
        issued_at,
    })
}
