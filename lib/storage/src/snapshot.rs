//! Snapshot persistence for derived state
//!
//! One self-contained binary artifact holds a full generation. The envelope
//! carries a format version tag, a creation timestamp, and a SHA-256
//! checksum of the serialized state; the payload itself is gzip-compressed
//! bincode. Writes replace the artifact atomically via a temp file.

use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rapport_core::{Error, Result};
use rapport_encoding::DerivedState;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Default snapshot filename, resolved against the working directory.
pub const DEFAULT_SNAPSHOT_FILE: &str = "similarity.snapshot";

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEnvelope {
    version: u32,
    created_at: i64,
    checksum: String,
    payload: Vec<u8>,
}

/// Snapshot metadata for status reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub version: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub users: usize,
    pub size: u64,
    pub checksum: String,
}

/// Reads and writes one snapshot artifact at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Persist a full generation, atomically replacing any previous artifact.
    pub fn save(&self, state: &DerivedState) -> Result<()> {
        let raw = bincode::serialize(state).map_err(|e| Error::Serialization(e.to_string()))?;
        let checksum = format!("{:x}", Sha256::digest(&raw));

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw)?;
        let payload = encoder.finish()?;

        let envelope = SnapshotEnvelope {
            version: SNAPSHOT_VERSION,
            created_at: Utc::now().timestamp(),
            checksum,
            payload,
        };
        let bytes =
            bincode::serialize(&envelope).map_err(|e| Error::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        AtomicFile::new(&self.path, OverwriteBehavior::AllowOverwrite)
            .write(|file| file.write_all(&bytes))
            .map_err(|e| match e {
                atomicwrites::Error::Internal(err) | atomicwrites::Error::User(err) => {
                    Error::Io(err)
                }
            })?;

        Ok(())
    }

    /// Load and verify the artifact, reconstructing the saved generation.
    ///
    /// A missing file surfaces as [`Error::SnapshotMissing`]; undecodable
    /// content, a failed checksum, a gzip fault, or a state that disagrees
    /// with its own layout as [`Error::SnapshotCorrupt`]; an unknown format
    /// version as [`Error::SnapshotVersion`].
    pub fn load(&self) -> Result<DerivedState> {
        let (envelope, _) = self.read_envelope()?;
        Self::decode_state(&envelope)
    }

    /// Describe the artifact without handing back a generation.
    pub fn describe(&self) -> Result<SnapshotInfo> {
        let (envelope, size) = self.read_envelope()?;
        let state = Self::decode_state(&envelope)?;

        Ok(SnapshotInfo {
            version: envelope.version,
            created_at: DateTime::from_timestamp(envelope.created_at, 0),
            users: state.len(),
            size,
            checksum: envelope.checksum,
        })
    }

    /// Remove the artifact. Removing a missing artifact is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn read_envelope(&self) -> Result<(SnapshotEnvelope, u64)> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::SnapshotMissing(self.path.clone()));
            }
            Err(e) => return Err(Error::Io(e)),
        };
        let size = bytes.len() as u64;

        let envelope: SnapshotEnvelope =
            bincode::deserialize(&bytes).map_err(|e| Error::SnapshotCorrupt(e.to_string()))?;

        if envelope.version != SNAPSHOT_VERSION {
            return Err(Error::SnapshotVersion {
                found: envelope.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        Ok((envelope, size))
    }

    fn decode_state(envelope: &SnapshotEnvelope) -> Result<DerivedState> {
        let mut raw = Vec::new();
        GzDecoder::new(envelope.payload.as_slice())
            .read_to_end(&mut raw)
            .map_err(|e| Error::SnapshotCorrupt(format!("payload not gzip: {e}")))?;

        let checksum = format!("{:x}", Sha256::digest(&raw));
        if checksum != envelope.checksum {
            return Err(Error::SnapshotCorrupt(format!(
                "checksum mismatch: expected {}, got {}",
                envelope.checksum, checksum
            )));
        }

        let state: DerivedState =
            bincode::deserialize(&raw).map_err(|e| Error::SnapshotCorrupt(e.to_string()))?;

        // Checksums cover the bytes, not what they decode to.
        if !state.is_consistent() {
            return Err(Error::SnapshotCorrupt(
                "state layout and vectors disagree".into(),
            ));
        }

        Ok(state)
    }
}
