//! Password hashing with Argon2id.
//!
//! The work factor is configurable; hashes record their own parameters in
//! the PHC string, so verification works across parameter changes.

use agora_shared::config::PasswordConfig;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, Version,
    password_hash::{
        PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The configured cost parameters are out of range.
    #[error("invalid argon2 parameters: {0}")]
    InvalidParams(String),

    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// Argon2id hasher carrying a fixed work factor.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher {
    /// Builds a hasher from configured cost parameters.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidParams` if argon2 rejects the costs.
    pub fn from_config(config: &PasswordConfig) -> Result<Self, PasswordError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a password, returning a PHC string with a random salt.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::HashError` if hashing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use agora_core::auth::PasswordHasher;
    ///
    /// let hash = PasswordHasher::default().hash("my_secure_password").unwrap();
    /// assert!(hash.starts_with("$argon2id$"));
    /// ```
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    /// Checks a password against a stored PHC hash.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidHash` if the hash format is invalid.
    /// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordHasher {
        PasswordHasher::from_config(&PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_is_phc_and_not_plaintext() {
        let hash = cheap().hash("p").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=1024,t=1,p=1"));
        assert_ne!(hash, "p");
    }

    #[test]
    fn test_verify_correct_and_wrong_password() {
        let hasher = cheap();
        let hash = hasher.hash("correct_password").unwrap();

        assert!(hasher.verify("correct_password", &hash).unwrap());
        assert!(!hasher.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = cheap();
        assert_ne!(hasher.hash("password1").unwrap(), hasher.hash("password1").unwrap());
    }

    #[test]
    fn test_verify_survives_parameter_change() {
        let hash = cheap().hash("rotate-me").unwrap();
        assert!(PasswordHasher::default().verify("rotate-me", &hash).unwrap());
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = cheap().verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }

    #[test]
    fn test_zero_memory_rejected() {
        let result = PasswordHasher::from_config(&PasswordConfig {
            memory_kib: 0,
            iterations: 1,
            parallelism: 1,
        });
        assert!(matches!(result, Err(PasswordError::InvalidParams(_))));
    }
}
