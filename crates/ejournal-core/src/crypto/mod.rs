//! Cryptographic operations for ejournal.
//!
//! - **scrypt**: memory-hard key derivation from the journal password
//! - **AES-128-GCM**: authenticated encryption of every blob on disk
//!
//! ## Security Model
//!
//! - The key is derived once per opened journal and never persisted
//! - Key material is zeroized from memory on drop
//! - A wrong password is only observable as an authentication failure
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the journal directory
//! - Offline tampering with entry or index blobs
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked process's memory

pub mod aead;
pub mod key;

pub use aead::{open, seal, NONCE_SIZE, TAG_SIZE};
pub use key::{derive_key, DerivedKey, KEY_LENGTH};
