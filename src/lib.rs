//! # Rapport
//!
//! Profile compatibility scoring engine.
//!
//! rapport derives one-hot / multi-hot behavioral encodings for every user
//! in a profile store, scores pairs with cosine similarity, ranks nearest
//! neighbors, and explains each score per attribute. Derived state is
//! persisted as a single versioned snapshot so queries do not pay the
//! encoding cost.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! export RAPPORT_STORE_URL=https://store.example.com
//! export RAPPORT_STORE_KEY=secret
//! rapport refresh
//! rapport similarity alice bob
//! rapport similar-users alice --top 5
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use rapport::prelude::*;
//!
//! # async fn demo() -> Result<()> {
//! let config = StoreConfig::from_env()?;
//! let service = SimilarityService::new(
//!     RestProfileStore::new(config),
//!     SnapshotStore::new(DEFAULT_SNAPSHOT_FILE),
//!     ServiceOptions::default(),
//! );
//!
//! service.refresh().await?;
//! let score = service.get_similarity("alice", "bob")?;
//! let report = service.get_compatibility_breakdown("alice", "bob")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! rapport is composed of several crates:
//!
//! - `rapport-core` - Vectors, cosine kernels, profile records, errors
//! - `rapport-encoding` - Attribute encoders, feature layout, vectorizer
//! - `rapport-storage` - Versioned snapshot persistence
//! - `rapport-service` - Profile store boundary and the query facade

// Re-export core types
pub use rapport_core::{similarity, AttrValue, Error, Result, UserRecord, Vector};

// Re-export encoding
pub use rapport_encoding::{
    default_attributes, AttributeEncoder, AttributeKind, AttributeSpec, DerivedState,
    FeatureLayout, LayoutEntry, ProfileVectorizer,
};

// Re-export storage
pub use rapport_storage::{SnapshotInfo, SnapshotStore, DEFAULT_SNAPSHOT_FILE, SNAPSHOT_VERSION};

// Re-export service
pub use rapport_service::{
    rows_to_records, CompatibilityReport, ProfileSource, RestProfileStore, ServiceOptions,
    SimilarUser, SimilarityService, StatusReport, StoreConfig, DEFAULT_TOP_N,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AttrValue, AttributeKind, AttributeSpec, CompatibilityReport, DerivedState, Error,
        ProfileSource, ProfileVectorizer, RestProfileStore, Result, ServiceOptions, SimilarUser,
        SimilarityService, SnapshotStore, StatusReport, StoreConfig, UserRecord, Vector,
        DEFAULT_SNAPSHOT_FILE, DEFAULT_TOP_N,
    };
}
