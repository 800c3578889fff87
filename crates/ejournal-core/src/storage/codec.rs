//! Blob encoding and the backward-compatible decode chain.
//!
//! Three generations of blobs exist on disk. All share the AEAD framing from
//! [`crate::crypto::aead`]; they differ in the plaintext layer or in a framing
//! quirk:
//!
//! 1. current: gzip-compressed JSON
//! 2. oldest: raw JSON
//! 3. legacy v1 framing: `nonce || 0x00 0x00 || ciphertext`
//!
//! New blobs are always written in the current encoding.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::crypto::aead::{self, NONCE_SIZE};
use crate::crypto::DerivedKey;
use crate::error::{JournalError, Result};

/// Bytes the legacy v1 framing inserted between nonce and ciphertext.
const LEGACY_GAP: [u8; 2] = [0x00, 0x00];

/// Why a single plaintext strategy rejected its input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StrategyFailure {
    Decompress(String),
    Parse(String),
}

type PlaintextStrategy = fn(&[u8]) -> std::result::Result<Vec<u8>, StrategyFailure>;

/// Plaintext decoders, tried in order. The first success wins.
const PLAINTEXT_STRATEGIES: [PlaintextStrategy; 2] = [gunzip, raw_json];

/// Compress then seal `plaintext` in the current encoding.
pub fn encode(plaintext: &[u8], key: &DerivedKey) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(plaintext)?;
    let compressed = encoder.finish()?;
    aead::seal(&compressed, key)
}

/// Open and decode a blob written by any generation of the store.
///
/// # Errors
///
/// - `AuthenticationFailure` when neither framing authenticates
/// - `Format` when the opened plaintext is neither gzip nor JSON
pub fn decode(blob: &[u8], key: &DerivedKey) -> Result<Vec<u8>> {
    let opened = open_any_framing(blob, key)?;
    decode_plaintext(&opened)
}

fn open_any_framing(blob: &[u8], key: &DerivedKey) -> Result<Vec<u8>> {
    match aead::open(blob, key) {
        Err(JournalError::AuthenticationFailure) if has_legacy_gap(blob) => {
            aead::open_parts(blob, LEGACY_GAP.len(), key)
        }
        other => other,
    }
}

fn has_legacy_gap(blob: &[u8]) -> bool {
    blob.get(NONCE_SIZE..NONCE_SIZE + LEGACY_GAP.len()) == Some(&LEGACY_GAP[..])
}

fn decode_plaintext(opened: &[u8]) -> Result<Vec<u8>> {
    let mut decompress = String::from("no decompression attempted");
    let mut parse = String::from("no parse attempted");

    for strategy in PLAINTEXT_STRATEGIES {
        match strategy(opened) {
            Ok(decoded) => return Ok(decoded),
            Err(StrategyFailure::Decompress(reason)) => decompress = reason,
            Err(StrategyFailure::Parse(reason)) => parse = reason,
        }
    }

    Err(JournalError::Format { decompress, parse })
}

fn gunzip(opened: &[u8]) -> std::result::Result<Vec<u8>, StrategyFailure> {
    if opened.is_empty() {
        return Err(StrategyFailure::Decompress("empty input".to_string()));
    }

    let mut decompressed = Vec::new();
    GzDecoder::new(opened)
        .read_to_end(&mut decompressed)
        .map_err(|e| StrategyFailure::Decompress(e.to_string()))?;
    Ok(decompressed)
}

/// Accepts a JSON object, the shape of both entry and index blobs.
fn raw_json(opened: &[u8]) -> std::result::Result<Vec<u8>, StrategyFailure> {
    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(opened)
        .map_err(|e| StrategyFailure::Parse(e.to_string()))?;
    Ok(opened.to_vec())
}
