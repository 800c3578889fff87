//! Key derivation using scrypt.
//!
//! The work factor is stored in the journal config as a power of two
//! (`N = 2^work_factor`); block size and parallelism are fixed.

use scrypt::Params;
use zeroize::ZeroizeOnDrop;

use crate::error::{JournalError, Result};

/// scrypt block size parameter.
const SCRYPT_BLOCK_SIZE: u32 = 8;
/// scrypt parallelism parameter.
const SCRYPT_PARALLELISM: u32 = 1;

/// Length of derived key in bytes (16 bytes = AES-128).
pub const KEY_LENGTH: usize = 16;

/// A cryptographic key derived from the journal password.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a password with scrypt.
///
/// Deterministic: the same password, salt and work factor always produce the
/// same key. A wrong password is not detected here; it silently yields a
/// different key and only fails later when a blob is opened.
///
/// # Errors
///
/// Returns `JournalError::KeyDerivation` when the work factor is rejected by
/// scrypt's parameter check. Password content never causes an error.
///
/// # Examples
///
/// ```
/// use ejournal_core::crypto::derive_key;
///
/// let key = derive_key("my-passphrase", b"per-journal-salt", 4).unwrap();
/// assert_eq!(key.as_bytes().len(), 16);
/// ```
pub fn derive_key(password: &str, salt: &[u8], work_factor: u8) -> Result<DerivedKey> {
    let params = Params::new(
        work_factor,
        SCRYPT_BLOCK_SIZE,
        SCRYPT_PARALLELISM,
        KEY_LENGTH,
    )
    .map_err(|e| {
        JournalError::KeyDerivation(format!("Invalid work factor {}: {}", work_factor, e))
    })?;

    let mut key_bytes = [0u8; KEY_LENGTH];
    scrypt::scrypt(password.as_bytes(), salt, &params, &mut key_bytes)
        .map_err(|e| JournalError::KeyDerivation(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey::from_bytes(key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_WORK_FACTOR: u8 = 4;

    #[test]
    fn test_key_derivation_deterministic() {
        let salt = b"unique-salt-1234567890123456";

        let key1 = derive_key("test-passphrase", salt, TEST_WORK_FACTOR).unwrap();
        let key2 = derive_key("test-passphrase", salt, TEST_WORK_FACTOR).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("test-passphrase", b"salt-one", TEST_WORK_FACTOR).unwrap();
        let key2 = derive_key("test-passphrase", b"salt-two", TEST_WORK_FACTOR).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_work_factor_different_key() {
        let salt = b"fixed-salt";
        let key1 = derive_key("test-passphrase", salt, 4).unwrap();
        let key2 = derive_key("test-passphrase", salt, 5).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_passphrase_different_key() {
        let salt = b"fixed-salt-123456789012345";

        let key1 = derive_key("passphrase-one", salt, TEST_WORK_FACTOR).unwrap();
        let key2 = derive_key("passphrase-two", salt, TEST_WORK_FACTOR).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_empty_password_is_not_an_error() {
        assert!(derive_key("", b"salt", TEST_WORK_FACTOR).is_ok());
    }

    #[test]
    fn test_oversized_work_factor_rejected() {
        // scrypt requires log_n < r * 16
        let result = derive_key("test-passphrase", b"salt", 200);
        assert!(matches!(result, Err(JournalError::KeyDerivation(_))));
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let key = derive_key("test-passphrase", b"salt", TEST_WORK_FACTOR).unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
