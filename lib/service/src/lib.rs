//! Service layer for the rapport compatibility engine: profile store
//! boundary, environment configuration, refresh lifecycle, and the query
//! facade.

pub mod config;
pub mod profile;
pub mod service;

pub use config::StoreConfig;
pub use profile::{rows_to_records, ProfileSource, RestProfileStore};
pub use service::{
    CompatibilityReport, ServiceOptions, SimilarUser, SimilarityService, StatusReport,
    DEFAULT_TOP_N,
};
