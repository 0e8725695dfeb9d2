//! Salted PBKDF2-HMAC-SHA256 password hashing for admin accounts.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;

#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
    pub iterations: u32,
}

pub fn hash_password(password: &str, iterations: u32) -> PasswordHash {
    let iterations = iterations.max(1);
    let mut salt = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    let key = derive_key(password, &salt, iterations);
    PasswordHash {
        hash: B64.encode(key),
        salt: B64.encode(salt),
        iterations,
    }
}

/// False on mismatch and on an undecodable stored salt or hash.
/// Key bytes are compared in constant time.
pub fn verify_password(password: &str, hash: &str, salt: &str, iterations: u32) -> bool {
    let (salt, expected) = match (B64.decode(salt), B64.decode(hash)) {
        (Ok(salt), Ok(expected)) => (salt, expected),
        _ => return false,
    };
    let key = derive_key(password, &salt, iterations.max(1));
    bool::from(key.as_slice().ct_eq(expected.as_slice()))
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}
