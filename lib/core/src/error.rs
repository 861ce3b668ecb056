use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Profile store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Snapshot not found: {}", .0.display())]
    SnapshotMissing(PathBuf),

    #[error("Snapshot corrupt: {0}")]
    SnapshotCorrupt(String),

    #[error("Unsupported snapshot version: found {found}, expected {expected}")]
    SnapshotVersion { found: u32, expected: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
