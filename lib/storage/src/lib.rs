pub mod snapshot;

pub use snapshot::{SnapshotInfo, SnapshotStore, DEFAULT_SNAPSHOT_FILE, SNAPSHOT_VERSION};
