use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Length policy applied at registration. Counts characters, not bytes.
pub fn check_password_policy(plain: &str) -> Result<(), &'static str> {
    match plain.chars().count() {
        n if n < MIN_PASSWORD_LEN => Err("Password too short"),
        n if n > MAX_PASSWORD_LEN => Err("Password too long"),
        _ => Ok(()),
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow::anyhow!("argon2 hash: {e}"))
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| anyhow::anyhow!("argon2 parse: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original() {
        let hash = hash_password("oatmeal-and-berries").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("oatmeal-and-berries", &hash).unwrap());
        assert!(!verify_password("oatmeal-and-banana", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_fresh_salt() {
        assert_ne!(hash_password("12345678").unwrap(), hash_password("12345678").unwrap());
    }

    #[test]
    fn unreadable_hash_is_an_error() {
        assert!(verify_password("anything", "plaintext").is_err());
    }

    #[test]
    fn policy_bounds() {
        assert_eq!(check_password_policy("short"), Err("Password too short"));
        assert!(check_password_policy("exactly8").is_ok());
        assert!(check_password_policy("ééééééé").is_err());
        assert_eq!(
            check_password_policy(&"x".repeat(MAX_PASSWORD_LEN + 1)),
            Err("Password too long")
        );
    }
}
