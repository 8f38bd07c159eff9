//! Vault status as seen by a presentation layer.

use serde::{Deserialize, Serialize};

/// Represents the current state of the vault.
///
/// The vault transitions between these states:
/// - `NotSetup` → `Unlocked` (after `initialize`)
/// - `Unlocked` → `Locked` (when the session is locked)
/// - `Locked` → `Unlocked` (after a successful `unlock`)
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum VaultStatus {
    /// No key file yet (first run)
    #[default]
    NotSetup,
    /// Key file exists but no key is held in memory
    Locked,
    /// Session holds the derived key; records are accessible
    Unlocked,
}

impl std::fmt::Display for VaultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSetup => write!(f, "NotSetup"),
            Self::Locked => write!(f, "Locked"),
            Self::Unlocked => write!(f, "Unlocked"),
        }
    }
}
