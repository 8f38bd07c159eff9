use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Result, VaultError};

/// Default file holding `salt || base64url(derived key)`.
pub const DEFAULT_KEY_FILE: &str = "encryption.key";

/// Default file holding the pretty-printed record collection.
pub const DEFAULT_COLLECTION_FILE: &str = "passwords.json";

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 12;

pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

/// Work factor below which a warning is logged on validation.
const RECOMMENDED_MIN_PBKDF2_ITERATIONS: u32 = 100_000;

/// How a missing or unparseable collection file is treated on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Missing or corrupt file loads as an empty collection.
    #[default]
    Lenient,
    /// Missing file loads as empty; a corrupt file is an error.
    Strict,
}

/// Password-based key derivation parameters.
///
/// These are not recorded in the key file, so a vault must be unlocked
/// with the same parameters it was initialized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum KdfConfig {
    /// PBKDF2-HMAC-SHA256
    Pbkdf2Sha256 { iterations: u32 },
    /// Argon2id (v0x13)
    #[serde(rename_all = "camelCase")]
    Argon2id {
        memory_kib: u32,
        time_cost: u32,
        parallelism: u32,
    },
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self::Pbkdf2Sha256 {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VaultConfig {
    pub key_file_path: PathBuf,
    pub collection_file_path: PathBuf,
    pub load_policy: LoadPolicy,
    pub kdf: KdfConfig,
    pub min_password_length: usize,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            key_file_path: PathBuf::from(DEFAULT_KEY_FILE),
            collection_file_path: PathBuf::from(DEFAULT_COLLECTION_FILE),
            load_policy: LoadPolicy::default(),
            kdf: KdfConfig::default(),
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl VaultConfig {
    /// Default configuration with both files placed under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            key_file_path: dir.join(DEFAULT_KEY_FILE),
            collection_file_path: dir.join(DEFAULT_COLLECTION_FILE),
            ..Self::default()
        }
    }

    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    pub fn with_kdf(mut self, kdf: KdfConfig) -> Self {
        self.kdf = kdf;
        self
    }

    /// Check the configuration for values that would make the vault unusable.
    pub fn validate(&self) -> Result<()> {
        if self.min_password_length == 0 {
            return Err(VaultError::Config(
                "minPasswordLength must be at least 1".into(),
            ));
        }

        if self.key_file_path == self.collection_file_path {
            return Err(VaultError::Config(format!(
                "keyFilePath and collectionFilePath must differ (both {:?})",
                self.key_file_path
            )));
        }

        match self.kdf {
            KdfConfig::Pbkdf2Sha256 { iterations } => {
                if iterations == 0 {
                    return Err(VaultError::Config(
                        "PBKDF2 iterations must be greater than zero".into(),
                    ));
                }
                if iterations < RECOMMENDED_MIN_PBKDF2_ITERATIONS {
                    warn!(
                        "PBKDF2 iterations ({}) below recommended minimum of {}",
                        iterations, RECOMMENDED_MIN_PBKDF2_ITERATIONS
                    );
                }
            }
            KdfConfig::Argon2id {
                memory_kib,
                time_cost,
                parallelism,
            } => {
                argon2::Params::new(memory_kib, time_cost, parallelism, None)
                    .map_err(|e| VaultError::Config(format!("Invalid Argon2 params: {}", e)))?;
            }
        }

        Ok(())
    }
}

/// Load a configuration file, falling back to defaults if it does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<VaultConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(VaultConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: VaultConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

pub fn save_config(path: impl AsRef<Path>, config: &VaultConfig) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
