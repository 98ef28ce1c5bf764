use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

/// Newtype for password to prevent accidental logging
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Newtype for a stored password hash: an Argon2 PHC string, or bcrypt for
/// accounts created before the switch to Argon2.
#[derive(Debug, Clone)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    /// bcrypt (`$2a$`, `$2b$`, `$2y$`) hashes are verified but no longer issued.
    pub fn is_legacy(&self) -> bool {
        self.0.starts_with("$2")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Hash a password using Argon2id with a random salt.
pub fn hash_password(password: &Password) -> Result<PasswordHashString, anyhow::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(PasswordHashString::new(password_hash))
}

/// Verify a password against a hash.
pub fn verify_password(
    password: &Password,
    password_hash: &PasswordHashString,
) -> Result<(), anyhow::Error> {
    if password_hash.is_legacy() {
        let verified = bcrypt::verify(password.as_str(), password_hash.as_str())
            .map_err(|e| anyhow::anyhow!("Invalid bcrypt hash: {}", e))?;
        return if verified {
            Ok(())
        } else {
            Err(anyhow::anyhow!("Password verification failed"))
        };
    }

    let parsed_hash = PasswordHash::new(password_hash.as_str())
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

    Argon2::default()
        .verify_password(password.as_str().as_bytes(), &parsed_hash)
        .map_err(|_| anyhow::anyhow!("Password verification failed"))
}

static DUMMY_HASH: OnceLock<Option<PasswordHashString>> = OnceLock::new();

/// Check credentials for a possibly unknown user.
///
/// When `stored` is `None` the password is still verified against a fixed
/// hash so that "unknown user" and "wrong password" take the same time.
pub fn verify_credentials(password: &Password, stored: Option<&PasswordHashString>) -> bool {
    match stored {
        Some(hash) => verify_password(password, hash).is_ok(),
        None => {
            let dummy = DUMMY_HASH.get_or_init(|| {
                hash_password(&Password::new("laundry-dummy-credential".to_string())).ok()
            });
            if let Some(hash) = dummy {
                let _ = verify_password(password, hash);
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = Password::new("rahasia123".to_string());
        let hash = hash_password(&password).expect("Failed to hash password");

        assert!(hash.as_str().starts_with("$argon2"));
        assert!(!hash.as_str().contains("rahasia123"));
    }

    #[test]
    fn test_verify_password_correct_and_incorrect() {
        let password = Password::new("rahasia123".to_string());
        let hash = hash_password(&password).expect("Failed to hash password");

        assert!(verify_password(&password, &hash).is_ok());
        assert!(verify_password(&Password::new("salah".to_string()), &hash).is_err());
    }

    // OpenBSD bcrypt test vector for "U*U".
    const BCRYPT_U_STAR_U: &str = "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW";

    #[test]
    fn test_verify_bcrypt_hash() {
        let hash = PasswordHashString::new(BCRYPT_U_STAR_U.to_string());
        assert!(hash.is_legacy());

        assert!(verify_password(&Password::new("U*U".to_string()), &hash).is_ok());
        assert!(verify_password(&Password::new("U*V".to_string()), &hash).is_err());
        assert!(verify_credentials(&Password::new("U*U".to_string()), Some(&hash)));
    }

    #[test]
    fn test_new_hashes_are_not_legacy() {
        let hash = hash_password(&Password::new("rahasia123".to_string())).unwrap();
        assert!(!hash.is_legacy());
    }

    #[test]
    fn test_verify_credentials_unknown_user_is_rejected() {
        let password = Password::new("laundry-dummy-credential".to_string());
        assert!(!verify_credentials(&password, None));
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("rahasia123".to_string());
        assert_eq!(format!("{:?}", password), "Password(***)");
    }
}
