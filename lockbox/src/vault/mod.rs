//! Credential vault.
//!
//! The master password is transformed via a password-based KDF into the
//! vault key. The key file keeps the salt and the derivation output so a
//! later unlock can verify the password; the master password itself is
//! never stored. Record passwords are sealed with the key before they are
//! written to the collection file.

pub mod auth;
pub mod kdf;
pub mod keyfile;
pub mod manager;
pub mod session;
pub mod store;

pub use auth::VaultStatus;
pub use kdf::{derive_key, SALT_SIZE};
pub use keyfile::MasterKeyMaterial;
pub use manager::VaultManager;
pub use session::VaultSession;
pub use store::RecordStore;
