use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use rand::Rng;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;

/// Hash a password as `pbkdf2:sha256:iterations$salt$hash`
/// PBKDF2-HMAC-SHA256 with a 16-byte random salt, both parts base64 URL-safe without padding
pub fn hash_password(password: &str, iterations: u32) -> Result<String, AppError> {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill(&mut salt);

    let key = derive(password, &salt, iterations, KEY_LENGTH)?;

    Ok(format!(
        "pbkdf2:sha256:{}${}${}",
        iterations,
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(key)
    ))
}

/// Check a password against a stored hash, using the iteration count recorded in it
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let malformed = || AppError::internal("malformed password hash");

    // Parse: pbkdf2:sha256:iterations$salt$hash
    let mut parts = stored_hash.split('$');
    let (Some(header), Some(salt_b64), Some(hash_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    let iterations = match header.split(':').collect::<Vec<_>>().as_slice() {
        ["pbkdf2", "sha256", iterations] => iterations.parse::<u32>().map_err(|_| malformed())?,
        _ => return Err(malformed()),
    };

    let salt = URL_SAFE_NO_PAD.decode(salt_b64).map_err(|_| malformed())?;
    let expected = URL_SAFE_NO_PAD.decode(hash_b64).map_err(|_| malformed())?;
    if expected.is_empty() {
        return Err(malformed());
    }

    let computed = derive(password, &salt, iterations, expected.len())?;

    Ok(constant_time_eq(&computed, &expected))
}

fn derive(password: &str, salt: &[u8], iterations: u32, len: usize) -> Result<Vec<u8>, AppError> {
    let mut key = vec![0u8; len];
    pbkdf2::<HmacSha256>(password.as_bytes(), salt, iterations, &mut key)
        .map_err(|e| AppError::internal(format!("PBKDF2 failed: {e}")))?;
    Ok(key)
}

// Compares every byte so timing does not reveal the first mismatch
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: u32 = 1_000;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Admin@123", FAST).unwrap();

        assert!(hash.starts_with("pbkdf2:sha256:1000$"));
        assert!(verify_password("Admin@123", &hash).unwrap());
        assert!(!verify_password("admin@123", &hash).unwrap());
    }

    #[test]
    fn test_salt_is_random() {
        let a = hash_password("same", FAST).unwrap();
        let b = hash_password("same", FAST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_iterations_come_from_the_stored_hash() {
        let hash = hash_password("secret", 2_000).unwrap();
        assert!(verify_password("secret", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        assert!(verify_password("x", "not-a-hash").is_err());
        assert!(verify_password("x", "bcrypt:10$abc$def").is_err());
        assert!(verify_password("x", "pbkdf2:sha256:many$abc$def").is_err());
    }
}
