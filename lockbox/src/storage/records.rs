//! Credential records and the flat collection file they persist to.
//!
//! The collection is a single pretty-printed JSON array of
//! `{website, username, password}` objects where `password` holds a
//! ciphertext token. Every mutation rewrites the whole file.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::config::LoadPolicy;
use super::files::write_private_atomic;
use crate::error::{Result, VaultError};

/// A website/username/password triple with a plaintext password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialRecord {
    pub website: String,
    pub username: String,
    pub password: String,
}

impl CredentialRecord {
    pub fn new(
        website: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            website: website.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// All three fields must be non-empty.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("website", &self.website),
            ("username", &self.username),
            ("password", &self.password),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(VaultError::InvalidRecord(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("website", &self.website)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A record as it sits on disk: `password` is a ciphertext token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub website: String,
    pub username: String,
    pub password: String,
}

/// Read the collection file.
///
/// A missing file is an empty collection. A file that cannot be parsed is
/// an empty collection under [`LoadPolicy::Lenient`] and
/// [`VaultError::Corrupted`] under [`LoadPolicy::Strict`].
pub fn read_collection(path: &Path, policy: LoadPolicy) -> Result<Vec<StoredRecord>> {
    let parsed = match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str::<Vec<StoredRecord>>(&content)
            .map_err(|e| e.to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No collection file at {:?}, starting empty", path);
            return Ok(Vec::new());
        }
        // Not UTF-8
        Err(e) if e.kind() == ErrorKind::InvalidData => Err(e.to_string()),
        Err(e) => return Err(e.into()),
    };

    match (parsed, policy) {
        (Ok(records), _) => {
            debug!("Loaded {} records from {:?}", records.len(), path);
            Ok(records)
        }
        (Err(reason), LoadPolicy::Lenient) => {
            warn!(
                "Collection file {:?} is corrupted ({}), treating as empty",
                path, reason
            );
            Ok(Vec::new())
        }
        (Err(reason), LoadPolicy::Strict) => Err(VaultError::Corrupted(format!(
            "{}: {}",
            path.display(),
            reason
        ))),
    }
}

/// Rewrite the whole collection file.
pub fn write_collection(path: &Path, records: &[StoredRecord]) -> Result<()> {
    let mut content = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    records.serialize(&mut serializer)?;

    write_private_atomic(path, &content)?;
    debug!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}
