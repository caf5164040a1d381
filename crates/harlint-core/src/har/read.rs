use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{fs, path::Path};

use crate::har::model::CaptureRecord;

/// A capture document read from disk, together with a stable identity.
///
/// The identity depends **only** on the file bytes, so repeated analysis of
/// the same capture can be correlated across runs and log output.
#[derive(Debug, Clone)]
pub struct CaptureContext {
    /// Optional source path (informational only).
    pub path: Option<String>,

    /// Size of the capture document in bytes.
    pub size_bytes: u64,

    /// Hash algorithm used for fingerprinting.
    pub hash_alg: String,

    /// Hex-encoded hash of the document bytes.
    pub hash_hex: String,

    /// The decoded capture.
    pub record: CaptureRecord,
}

impl CaptureContext {
    /// Report-facing capture metadata, without the decoded entries.
    pub fn info(&self) -> CaptureInfo {
        CaptureInfo {
            path: self.path.clone(),
            size_bytes: self.size_bytes,
            hash: CaptureHash {
                algorithm: self.hash_alg.clone(),
                value: self.hash_hex.clone(),
            },
        }
    }
}

/// Capture metadata bound to a run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureInfo {
    pub path: Option<String>,
    pub size_bytes: u64,
    pub hash: CaptureHash,
}

/// Cryptographic capture fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureHash {
    pub algorithm: String,
    pub value: String,
}

/// Read and decode a HAR document, computing its identity fingerprint.
///
/// Filesystem metadata (timestamps, permissions, etc.) never influences the
/// fingerprint, so identical bytes always produce the identical identity.
pub fn read_capture(path: &Path) -> Result<CaptureContext> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read capture: {}", path.display()))?;

    let record: CaptureRecord = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to decode HAR document: {}", path.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hasher.finalize();

    Ok(CaptureContext {
        path: Some(path.display().to_string()),
        size_bytes: bytes.len() as u64,
        hash_alg: "sha256".to_string(),
        hash_hex: hex::encode(digest),
        record,
    })
}
