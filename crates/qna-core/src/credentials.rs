use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;

const PHC_ARGON2_PREFIX: &str = "$argon2";

/// Check a supplied password against the stored value.
///
/// Stored values are compared verbatim unless they are Argon2 PHC strings,
/// in which case they are verified with Argon2.
pub fn verify_password(stored: &str, supplied: &str) -> bool {
    if stored.starts_with(PHC_ARGON2_PREFIX) {
        return match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(supplied.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        };
    }
    stored == supplied
}

/// Hash with Argon2id and a fresh salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}
