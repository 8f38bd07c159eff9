//! VaultSession - master key lifecycle.
//!
//! A session derives the vault key from the master password, verifies it
//! against the key file, and holds it in memory for record encryption.
//! Sessions are independent values: several can exist in one process, each
//! pointing at its own key file.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::auth::VaultStatus;
use super::kdf::derive_key;
use super::keyfile::{generate_salt, key_file_exists, read_key_file, write_key_file, MasterKeyMaterial};
use crate::error::{Result, VaultError};
use crate::security::{open_token, seal_token, VaultKey};
use crate::storage::{KdfConfig, VaultConfig};

pub struct VaultSession {
    key_file_path: PathBuf,
    kdf: KdfConfig,
    min_password_length: usize,
    /// The derived encryption key (only present when the session is ready)
    key: Option<VaultKey>,
}

impl VaultSession {
    /// Create a session that is not yet ready.
    pub fn new(config: &VaultConfig) -> Self {
        Self {
            key_file_path: config.key_file_path.clone(),
            kdf: config.kdf,
            min_password_length: config.min_password_length,
            key: None,
        }
    }

    pub fn key_file_path(&self) -> &Path {
        &self.key_file_path
    }

    /// Whether a key file exists for this session.
    pub fn is_initialized(&self) -> bool {
        key_file_exists(&self.key_file_path)
    }

    pub fn is_ready(&self) -> bool {
        self.key.is_some()
    }

    pub fn status(&self) -> VaultStatus {
        if self.is_ready() {
            VaultStatus::Unlocked
        } else if self.is_initialized() {
            VaultStatus::Locked
        } else {
            VaultStatus::NotSetup
        }
    }

    /// Set up a new vault with the given master password.
    ///
    /// Generates a fresh salt, derives the key and writes the key file,
    /// replacing any existing one. Records sealed under a previous key can
    /// no longer be decrypted afterwards.
    pub fn initialize(&mut self, master_password: &str) -> Result<()> {
        self.key = None;

        if master_password.chars().count() < self.min_password_length {
            return Err(VaultError::WeakPassword {
                min: self.min_password_length,
            });
        }

        if self.is_initialized() {
            warn!(
                "Overwriting existing key file at {:?}; previously stored records become unreadable",
                self.key_file_path
            );
        }
        info!("Initializing vault key at {:?}", self.key_file_path);

        let salt = generate_salt();
        let derived_key = derive_key(master_password, &salt, &self.kdf)?;
        let material = MasterKeyMaterial { salt, derived_key };

        write_key_file(&self.key_file_path, &material)?;

        self.key = Some(material.derived_key.clone());
        info!("Vault initialized successfully");
        Ok(())
    }

    /// Unlock an existing vault with the given master password.
    ///
    /// A failed attempt leaves the session not ready.
    pub fn unlock(&mut self, master_password: &str) -> Result<()> {
        self.key = None;

        let stored = read_key_file(&self.key_file_path)?;
        info!("Unlocking vault with key file {:?}", self.key_file_path);

        let derived = derive_key(master_password, &stored.salt, &self.kdf)?;
        if !derived.ct_eq(&stored.derived_key) {
            warn!("Master password verification failed");
            return Err(VaultError::Authentication);
        }

        self.key = Some(derived);
        info!("Vault unlocked successfully");
        Ok(())
    }

    /// Drop the key from memory. Store operations fail until unlocked again.
    pub fn lock(&mut self) {
        if self.key.take().is_some() {
            info!("Vault session locked");
        }
    }

    pub(crate) fn require_ready(&self) -> Result<&VaultKey> {
        self.key.as_ref().ok_or(VaultError::SessionNotReady)
    }

    /// Encrypt a password field into a token.
    pub(crate) fn seal(&self, plaintext: &str) -> Result<String> {
        let key = self.require_ready()?;
        seal_token(key, plaintext.as_bytes())
    }

    /// Decrypt a password field token.
    pub(crate) fn open(&self, token: &str) -> Result<String> {
        let key = self.require_ready()?;
        let opened = open_token(key, token)?;
        debug!("Opened token issued at {}", opened.issued_at);
        opened.into_text()
    }
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("key_file_path", &self.key_file_path)
            .field("kdf", &self.kdf)
            .field("ready", &self.is_ready())
            .finish()
    }
}
