//! Error types for vault operations.
//!
//! Every failure a caller can act on has its own variant so a presentation
//! layer can pick the right prompt (retry, offer initialization, re-enter
//! fields) without parsing messages.

use thiserror::Error;

/// Errors that can occur during vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    /// The master password is shorter than the configured minimum.
    #[error("Master password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// No key file exists yet. Caller should offer initialization.
    #[error("Vault not initialized")]
    NotInitialized,

    /// The master password does not reproduce the stored key.
    #[error("Invalid master password")]
    Authentication,

    /// A record is missing one of its fields.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A stored token cannot be opened with the current session key.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// A store operation was attempted before initialize/unlock.
    #[error("Vault session is not ready")]
    SessionNotReady,

    /// The collection file could not be parsed (strict load policy only).
    #[error("Vault data is corrupted: {0}")]
    Corrupted(String),

    /// The key file exists but does not have the expected layout.
    #[error("Key file error: {0}")]
    KeyFile(String),

    /// Key derivation failed (bad KDF parameters).
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// An error occurred while sealing a token.
    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VaultError {
    /// Stable code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            VaultError::WeakPassword { .. } => "WEAK_PASSWORD",
            VaultError::NotInitialized => "NOT_INITIALIZED",
            VaultError::Authentication => "AUTHENTICATION_FAILED",
            VaultError::InvalidRecord(_) => "INVALID_RECORD",
            VaultError::Decryption(_) => "DECRYPTION_FAILED",
            VaultError::SessionNotReady => "SESSION_NOT_READY",
            VaultError::Corrupted(_) => "CORRUPTED",
            VaultError::KeyFile(_) => "KEY_FILE_ERROR",
            VaultError::KeyDerivation(_) => "KEY_DERIVATION_ERROR",
            VaultError::Encryption(_) => "ENCRYPTION_ERROR",
            VaultError::Config(_) => "CONFIG_ERROR",
            VaultError::Io(_) => "IO_ERROR",
            VaultError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

// ============================================================================
// Serialization for the presentation layer
// ============================================================================

impl serde::Serialize for VaultError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("VaultError", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
