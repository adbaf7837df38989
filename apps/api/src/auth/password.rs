use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Produces a `salt$hex` digest for storage. Salt is a fresh UUIDv4.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().to_string();
    format!("{salt}${}", digest_with_salt(&salt, password))
}

/// Verifies a candidate password against a stored `salt$hex` digest.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, hex)) => digest_with_salt(salt, password) == hex,
        None => false,
    }
}

fn digest_with_salt(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    let out = hasher.finalize();
    out.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn test_same_password_different_salts() {
        let a = hash_password("secret");
        let b = hash_password("secret");
        assert_ne!(a, b);
        assert!(verify_password("secret", &a));
        assert!(verify_password("secret", &b));
    }

    #[test]
    fn test_malformed_digest_rejected() {
        assert!(!verify_password("anything", "no-dollar-separator"));
    }
}
