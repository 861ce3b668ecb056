//! # Rapport Core
//!
//! Core library for the rapport compatibility engine.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`Vector`] - Dense indicator vector with cosine operations
//! - [`UserRecord`] / [`AttrValue`] - Typed view over raw profile rows
//! - [`similarity`] - Slice-level cosine kernels used for ranking and
//!   per-attribute breakdowns
//! - [`Error`] / [`Result`] - Error taxonomy shared across the workspace

pub mod error;
pub mod record;
pub mod similarity;
pub mod vector;

pub use error::{Error, Result};
pub use record::{AttrValue, UserRecord};
pub use vector::Vector;
