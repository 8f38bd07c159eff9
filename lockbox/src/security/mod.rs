mod crypto;
mod generator;

pub use crypto::{open_token, seal_token, OpenedToken, VaultKey, KEY_SIZE};
pub use generator::{generate_password, DEFAULT_GENERATED_LENGTH};
