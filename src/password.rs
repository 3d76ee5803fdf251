use bcrypt::{hash, verify};

use crate::error::AppResult;

pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    Ok(hash(password, cost)?)
}

/// Checks `password` against a stored value.
///
/// Stored values that are not bcrypt hashes come from older users files that
/// kept passwords in plaintext; those are compared as-is.
pub fn password_matches(password: &str, stored: &str) -> bool {
    if is_bcrypt_hash(stored) {
        verify(password, stored).unwrap_or(false)
    } else {
        password == stored
    }
}

fn is_bcrypt_hash(stored: &str) -> bool {
    stored.len() == 60 && ["$2a$", "$2b$", "$2x$", "$2y$"].iter().any(|p| stored.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let stored = hash_password("hunter22", 4).unwrap();
        assert_ne!(stored, "hunter22");
        assert!(password_matches("hunter22", &stored));
        assert!(!password_matches("hunter23", &stored));
    }

    #[test]
    fn legacy_plaintext_compares_exactly() {
        assert!(password_matches("secret1", "secret1"));
        assert!(!password_matches("Secret1", "secret1"));
    }
}
