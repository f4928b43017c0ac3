//! Authenticated encryption of passwords using ChaCha20-Poly1305.
//!
//! A ciphertext token is `base64(nonce || ciphertext || tag)`, so a token
//! plus the store key is all that is needed to decrypt.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

/// Nonce size for ChaCha20-Poly1305.
const NONCE_LEN: usize = 12;

/// Poly1305 authentication tag size.
const TAG_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    Encrypt(String),

    #[error("ciphertext token is malformed: {0}")]
    Malformed(String),

    #[error("decryption failed: wrong key or corrupted data")]
    Decrypt,
}

/// Encrypt a password under `key`, returning a self-contained token.
/// A fresh random nonce is drawn for every call.
pub fn encrypt(plaintext: &str, key: &[u8]) -> Result<String, CipherError> {
    let cipher = ChaCha20Poly1305::new_from_slice(key)
        .map_err(|e| CipherError::Encrypt(format!("cipher init: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| CipherError::Encrypt(format!("encrypt: {e}")))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(blob))
}

/// Decrypt a token produced by [`encrypt`]. Fails without yielding any
/// plaintext when the token is malformed, authenticated under a different
/// key, or tampered with.
pub fn decrypt(token: &str, key: &[u8]) -> Result<Zeroizing<String>, CipherError> {
    let blob = STANDARD
        .decode(token)
        .map_err(|e| CipherError::Malformed(format!("base64: {e}")))?;
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(CipherError::Malformed(format!(
            "token too short: {} bytes",
            blob.len()
        )));
    }

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);
    let cipher = ChaCha20Poly1305::new_from_slice(key)
        .map_err(|e| CipherError::Malformed(format!("cipher init: {e}")))?;

    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CipherError::Decrypt)?;
    let plaintext =
        String::from_utf8(plaintext).map_err(|e| CipherError::Malformed(format!("utf-8: {e}")))?;
    Ok(Zeroizing::new(plaintext))
}
