use std::sync::{Arc, OnceLock};

use crate::auth::AuthError;

/// Default bcrypt work factor.
pub const DEFAULT_COST: u32 = 10;

/// bcrypt only reads this many bytes of input; longer passwords are refused
/// rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

const DUMMY_PASSWORD: &str = "inventory-api-timing-equalizer";

/// Salted bcrypt hashing with a fixed work factor.
///
/// Hashes are stored in the modular-crypt form (`$2b$<cost>$...`), so the cost
/// and salt travel with the digest and `verify` needs nothing but the string.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: Arc<OnceLock<Option<String>>>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password for storage.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::Hashing(format!(
                "password longer than {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        bcrypt::hash(password, self.cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Check a candidate password. Malformed hashes verify as `false`.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::debug!("Rejecting malformed password hash: {}", e);
                false
            }
        }
    }

    /// Spend the same work as a real verification and return `false`.
    ///
    /// Used when the username does not exist, so unknown users and wrong
    /// passwords take the same time to reject. An unusable cost falls back to
    /// [`DEFAULT_COST`] so the dummy still does real work.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let dummy = self.dummy_hash.get_or_init(|| {
            bcrypt::hash(DUMMY_PASSWORD, self.cost)
                .or_else(|_| bcrypt::hash(DUMMY_PASSWORD, DEFAULT_COST))
                .ok()
        });
        if let Some(hash) = dummy {
            let _ = bcrypt::verify(password, hash);
        }
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the suite fast.
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn verifies_own_hash() {
        let hasher = hasher();
        let hash = hasher.hash("mypassword").unwrap();
        assert!(hasher.verify("mypassword", &hash));
    }

    #[test]
    fn rejects_other_password() {
        let hasher = hasher();
        let hash = hasher.hash("mypassword").unwrap();
        assert!(!hasher.verify("mypassword2", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = hasher();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("same", &a));
        assert!(hasher.verify("same", &b));
    }

    #[test]
    fn encoding_carries_cost() {
        let hash = hasher().hash("pw").unwrap();
        assert!(hash.starts_with("$2b$04$"), "unexpected encoding: {}", hash);
    }

    #[test]
    fn default_cost_is_ten() {
        assert_eq!(PasswordHasher::default().cost(), 10);
    }

    #[test]
    fn malformed_hash_is_false() {
        let hasher = hasher();
        assert!(!hasher.verify("pw", ""));
        assert!(!hasher.verify("pw", "not-a-hash"));
        assert!(!hasher.verify("pw", "$2b$04$tooshort"));
    }

    #[test]
    fn invalid_cost_is_hashing_error() {
        let err = PasswordHasher::new(99).hash("pw").unwrap_err();
        assert!(matches!(err, AuthError::Hashing(_)));
    }

    #[test]
    fn shared_72_byte_prefix_does_not_verify() {
        let hasher = hasher();
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        let stored = hasher.hash(&prefix).unwrap();

        assert!(hasher.verify(&prefix, &stored));
        assert!(!hasher.verify(&format!("{}WRONG", prefix), &stored));
        assert!(!hasher.verify(&format!("{}correct-suffix", prefix), &stored));
    }

    #[test]
    fn over_long_password_is_hashing_error() {
        let long = format!("{}correct-suffix", "a".repeat(MAX_PASSWORD_BYTES));
        let err = hasher().hash(&long).unwrap_err();
        assert!(matches!(err, AuthError::Hashing(_)));
    }

    #[test]
    fn dummy_hash_exists_for_unusable_cost() {
        let hasher = PasswordHasher::new(99);
        assert!(!hasher.verify_dummy("x"));
        let dummy = hasher.dummy_hash.get().cloned().flatten().unwrap();
        assert!(dummy.starts_with("$2b$10$"), "unexpected encoding: {}", dummy);
    }

    #[test]
    fn dummy_never_matches() {
        let hasher = hasher();
        assert!(!hasher.verify_dummy(DUMMY_PASSWORD));
        assert!(!hasher.verify_dummy("anything"));
    }
}
