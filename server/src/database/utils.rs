use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Result, anyhow};
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::rngs::OsRng;

/// Unix time in seconds; 0 if the clock is before the epoch.
pub fn get_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Argon2id PHC string for `password`, salted from the OS RNG.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Password hashing failed: {}", e))
}

/// `Ok(false)` on a wrong password; `Err` only when `stored` is not a
/// valid PHC string.
pub fn verify_password(stored: &str, password: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| anyhow!("Stored hash is unreadable: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Usernames are 3 to 32 characters of letters, digits, `_` or `.`.
pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    if !(3..=32).contains(&len) {
        return false;
    }

    username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

/// Drop NUL bytes and surrounding whitespace before storing.
pub fn sanitize_string(input: &str) -> String {
    input.replace('\0', "").trim().to_string()
}
