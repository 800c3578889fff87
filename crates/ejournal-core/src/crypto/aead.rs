//! AES-128-GCM sealing of opaque blobs.
//!
//! Every blob on disk is `nonce || ciphertext || tag`. A fresh random nonce is
//! drawn from the OS RNG for each call to [`seal`], so nonces are never reused
//! under one key.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::key::DerivedKey;
use crate::error::{JournalError, Result};

/// Nonce length required by AES-GCM.
pub const NONCE_SIZE: usize = 12;

/// Authentication tag length appended by AES-GCM.
pub const TAG_SIZE: usize = 16;

fn cipher(key: &DerivedKey) -> Result<Aes128Gcm> {
    Aes128Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| JournalError::KeyDerivation(format!("Unusable key: {}", e)))
}

/// Seal `plaintext` under `key` with empty associated data.
///
/// Returns `nonce || ciphertext || tag`.
pub fn seal(plaintext: &[u8], key: &DerivedKey) -> Result<Vec<u8>> {
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher(key)?
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| JournalError::InvalidInput("Plaintext too large to encrypt".to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Open a blob produced by [`seal`].
///
/// # Errors
///
/// Returns `JournalError::AuthenticationFailure` if the blob is too short to
/// hold a nonce and tag, or if the tag does not verify (wrong key, corrupted
/// or tampered data).
pub fn open(blob: &[u8], key: &DerivedKey) -> Result<Vec<u8>> {
    open_parts(blob, 0, key)
}

/// Open a blob whose ciphertext starts `gap` bytes after the nonce.
pub(crate) fn open_parts(blob: &[u8], gap: usize, key: &DerivedKey) -> Result<Vec<u8>> {
    if blob.len() < NONCE_SIZE + gap + TAG_SIZE {
        return Err(JournalError::AuthenticationFailure);
    }

    let (nonce_bytes, rest) = blob.split_at(NONCE_SIZE);
    cipher(key)?
        .decrypt(Nonce::from_slice(nonce_bytes), &rest[gap..])
        .map_err(|_| JournalError::AuthenticationFailure)
}
