use rand::Rng;

use crate::error::{Result, VaultError};

/// Length used when the caller has no preference.
pub const DEFAULT_GENERATED_LENGTH: usize = 24;

const CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*_+=~";

/// Generate a random password of `length` characters drawn from letters,
/// digits and `!@#$%^&*_+=~`.
pub fn generate_password(length: usize) -> Result<String> {
    if length == 0 {
        return Err(VaultError::InvalidRecord(
            "generated password length must be greater than zero".into(),
        ));
    }

    let mut rng = rand::rng();
    Ok((0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect())
}
