use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
};
use rand::thread_rng;

use crate::{config::HashingConfig, error::AppError};

const MIN_PASSWORD_LEN: usize = 8;

/// Argon2id hasher with explicit cost parameters so tests can swap in cheap
/// ones instead of patching ambient state.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(cfg: &HashingConfig) -> Result<Self, AppError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|err| AppError::crypto_unavailable(format!("Invalid hashing costs: {err}")))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::validation("Password too short"));
        }

        let salt = SaltString::generate(&mut thread_rng());
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| AppError::crypto_unavailable(format!("Password hashing failed: {err}")))?
            .to_string();
        Ok(hash)
    }

    /// Malformed digests verify as `false` rather than erroring, so a broken
    /// stored hash is indistinguishable from a wrong password.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
pub(crate) fn test_hasher() -> PasswordHasher {
    use crate::config::HashingConfig;

    PasswordHasher::new(&HashingConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .expect("test hashing costs should be valid")
}

#[cfg(test)]
mod tests {
    use super::test_hasher;

    #[test]
    fn verify_accepts_matching_password() {
        let hasher = test_hasher();
        let digest = hasher.hash("password123").expect("hash should succeed");
        assert!(hasher.verify("password123", &digest));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = test_hasher();
        let digest = hasher.hash("password123").expect("hash should succeed");
        assert!(!hasher.verify("password124", &digest));
    }

    #[test]
    fn salting_makes_digests_differ_but_both_verify() {
        let hasher = test_hasher();
        let first = hasher.hash("password123").expect("hash should succeed");
        let second = hasher.hash("password123").expect("hash should succeed");
        assert_ne!(first, second);
        assert!(hasher.verify("password123", &first));
        assert!(hasher.verify("password123", &second));
    }

    #[test]
    fn malformed_digest_verifies_false_instead_of_erroring() {
        let hasher = test_hasher();
        assert!(!hasher.verify("password123", "not-a-phc-string"));
        assert!(!hasher.verify("password123", ""));
    }

    #[test]
    fn short_password_is_rejected_before_hashing() {
        let hasher = test_hasher();
        let err = hasher.hash("short").expect_err("hash should fail");
        assert_eq!(err.code(), "validation_error");
    }
}
