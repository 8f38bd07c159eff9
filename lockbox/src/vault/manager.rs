//! VaultManager - the interface a presentation layer talks to.
//!
//! Bundles one [`VaultSession`] with the [`RecordStore`] configured for the
//! same vault. Callers run `initialize` or `unlock` once and then issue
//! `save` / `list` / `find` / `delete` calls.

use tracing::info;

use super::auth::VaultStatus;
use super::session::VaultSession;
use super::store::RecordStore;
use crate::error::Result;
use crate::storage::{CredentialRecord, VaultConfig};

#[derive(Debug)]
pub struct VaultManager {
    config: VaultConfig,
    session: VaultSession,
    store: RecordStore,
}

impl VaultManager {
    /// Create a manager for the configured vault. The session starts locked.
    pub fn new(config: VaultConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Vault configured: key file {:?}, collection {:?}",
            config.key_file_path, config.collection_file_path
        );

        Ok(Self {
            session: VaultSession::new(&config),
            store: RecordStore::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn session(&self) -> &VaultSession {
        &self.session
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn status(&self) -> VaultStatus {
        self.session.status()
    }

    /// Check if a key file exists (the vault has been set up previously).
    pub fn is_initialized(&self) -> bool {
        self.session.is_initialized()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_ready()
    }

    pub fn initialize(&mut self, master_password: &str) -> Result<()> {
        self.session.initialize(master_password)
    }

    pub fn unlock(&mut self, master_password: &str) -> Result<()> {
        self.session.unlock(master_password)
    }

    pub fn lock(&mut self) {
        self.session.lock();
    }

    pub fn save(&self, record: &CredentialRecord) -> Result<()> {
        self.store.save(&self.session, record)
    }

    pub fn list(&self) -> Result<Vec<CredentialRecord>> {
        self.store.list(&self.session)
    }

    pub fn find(&self, website: &str) -> Result<Option<CredentialRecord>> {
        self.store.find(&self.session, website)
    }

    pub fn delete(&self, website: &str) -> Result<usize> {
        self.store.delete(&self.session, website)
    }
}
