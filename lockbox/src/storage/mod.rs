mod config;
mod files;
mod records;

pub use config::{
    load_config, save_config, KdfConfig, LoadPolicy, VaultConfig, DEFAULT_COLLECTION_FILE,
    DEFAULT_KEY_FILE, DEFAULT_MIN_PASSWORD_LENGTH, DEFAULT_PBKDF2_ITERATIONS,
};
pub(crate) use files::write_private_atomic;
pub use records::{read_collection, write_collection, CredentialRecord, StoredRecord};
