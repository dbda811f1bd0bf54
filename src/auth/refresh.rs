//! Opaque refresh tokens. Only their SHA-256 digest is persisted.

use sha2::{Digest, Sha256};

/// Returns 32 random bytes, hex-encoded.
pub fn generate_refresh_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

pub fn hash_refresh_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
