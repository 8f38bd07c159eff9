//! Local password vault.
//!
//! A master password is stretched into a 256-bit key; each stored password
//! is sealed with that key and appended to a flat JSON collection file.
//!
//! ```no_run
//! use lockbox::{CredentialRecord, VaultConfig, VaultManager};
//!
//! # fn main() -> lockbox::Result<()> {
//! let mut vault = VaultManager::new(VaultConfig::in_dir("/tmp/lockbox"))?;
//! if vault.is_initialized() {
//!     vault.unlock("correcthorsebattery")?;
//! } else {
//!     vault.initialize("correcthorsebattery")?;
//! }
//!
//! vault.save(&CredentialRecord::new("example.com", "alice", "p@ss1234"))?;
//! for record in vault.list()? {
//!     println!("{} / {}", record.website, record.username);
//! }
//! vault.delete("example.com")?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod security;
pub mod storage;
pub mod vault;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{Result, VaultError};
pub use security::{generate_password, DEFAULT_GENERATED_LENGTH};
pub use storage::{load_config, save_config, CredentialRecord, KdfConfig, LoadPolicy, VaultConfig};
pub use vault::{RecordStore, VaultManager, VaultSession, VaultStatus};

/// Install a tracing subscriber for the embedding application.
///
/// Honors `RUST_LOG`, defaulting to `lockbox=info`. Does nothing if a
/// global subscriber is already set.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lockbox=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
