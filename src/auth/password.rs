/// Stored in `users.password_hash` for accounts that authenticate through an
/// external identity provider.
pub const EXTERNAL_AUTH_SENTINEL: &str = "EXTERNAL_AUTH";

/// bcrypt only reads this many bytes of input; anything longer is refused
/// rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Plaintext hashed on the unknown-email login path so it costs the same as a
/// real verification.
pub const TIMING_DUMMY_PASSWORD: &str = "remotrack-timing-dummy";

/// Whether a stored hash belongs to an account without a local password.
pub fn is_external_account(stored: Option<&str>) -> bool {
    match stored {
        None => true,
        Some(h) => h.is_empty() || h == EXTERNAL_AUTH_SENTINEL,
    }
}

/// Hash a password with bcrypt at the given cost. Runs on the blocking pool.
pub async fn hash(password: String, cost: u32) -> Result<String, String> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(format!("Password exceeds {MAX_PASSWORD_BYTES} bytes"));
    }
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| format!("Hashing task failed: {e}"))?
        .map_err(|e| format!("Hashing failed: {e}"))
}

/// Verify a password against a bcrypt hash. Runs on the blocking pool.
/// Passwords longer than bcrypt's input never match.
pub async fn verify(password: String, hash: String) -> Result<bool, String> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| format!("Verification task failed: {e}"))?
        .map_err(|e| format!("Invalid hash: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_and_verify_roundtrip() {
        let hashed = hash("Remont2024!".to_string(), 4).await.unwrap();
        assert_ne!(hashed, "Remont2024!");
        assert!(verify("Remont2024!".to_string(), hashed.clone()).await.unwrap());
        assert!(!verify("remont2024!".to_string(), hashed).await.unwrap());
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let a = hash("same".to_string(), 4).await.unwrap();
        let b = hash("same".to_string(), 4).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn long_passwords_are_not_truncated() {
        let exact = "a".repeat(MAX_PASSWORD_BYTES);
        let hashed = hash(exact.clone(), 4).await.unwrap();
        assert!(verify(exact.clone(), hashed.clone()).await.unwrap());
        assert!(!verify(format!("{exact}ZZZ"), hashed).await.unwrap());

        assert!(hash("a".repeat(MAX_PASSWORD_BYTES + 1), 4).await.is_err());
    }

    #[tokio::test]
    async fn verify_errors_on_malformed_hash() {
        assert!(verify("anything".to_string(), "not-a-hash".to_string()).await.is_err());
    }

    #[test]
    fn sentinel_and_missing_hash_mark_external_accounts() {
        assert!(is_external_account(None));
        assert!(is_external_account(Some(EXTERNAL_AUTH_SENTINEL)));
        assert!(is_external_account(Some("")));
        assert!(!is_external_account(Some("$2b$12$abcdefghijklmnopqrstuv")));
    }
}
