//! Similarity service facade
//!
//! Owns the current derived-state generation and the refresh lifecycle.
//! Queries read an immutable generation behind an `Arc` handle; `refresh`
//! builds a replacement off to the side and swaps the handle in one motion,
//! so readers never observe a half-built generation.

use parking_lot::RwLock;
use rapport_core::{similarity, Error, Result};
use rapport_encoding::{DerivedState, LayoutEntry, ProfileVectorizer};
use rapport_storage::{SnapshotInfo, SnapshotStore};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::profile::ProfileSource;

/// Default number of neighbors returned by ranked queries.
pub const DEFAULT_TOP_N: usize = 10;

/// Behavior flags unifying the strict and lenient service variants.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceOptions {
    /// Error on unknown user ids instead of degrading to neutral results.
    pub strict_ids: bool,
    /// Rebuild from the profile store when the snapshot cannot be loaded
    /// at initialization.
    pub lenient_snapshot_load: bool,
}

/// One ranked neighbor of a target user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarUser {
    pub user_id: String,
    pub score: f32,
}

/// Overall similarity plus per-attribute sub-scores.
///
/// Sub-scores are keyed by attribute name; the ordered map keeps
/// serialized reports identical across runs.
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityReport {
    pub overall: f32,
    pub breakdown: BTreeMap<String, f32>,
}

impl CompatibilityReport {
    /// The neutral report queries degrade to.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            overall: 0.0,
            breakdown: BTreeMap::new(),
        }
    }
}

/// Readiness and generation metadata.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub ready: bool,
    pub users: usize,
    pub vector_width: usize,
    pub attributes: Vec<LayoutEntry>,
    pub snapshot: Option<SnapshotInfo>,
}

/// Facade over the vectorizer pipeline, snapshot store, and profile store.
pub struct SimilarityService<S: ProfileSource> {
    store: S,
    vectorizer: ProfileVectorizer,
    snapshots: SnapshotStore,
    options: ServiceOptions,
    generation: RwLock<Option<Arc<DerivedState>>>,
    refresh_guard: Mutex<()>,
}

impl<S: ProfileSource> SimilarityService<S> {
    #[must_use]
    pub fn new(store: S, snapshots: SnapshotStore, options: ServiceOptions) -> Self {
        Self {
            store,
            vectorizer: ProfileVectorizer::new(),
            snapshots,
            options,
            generation: RwLock::new(None),
            refresh_guard: Mutex::new(()),
        }
    }

    /// Replace the default vectorizer, builder style.
    #[must_use]
    pub fn with_vectorizer(mut self, vectorizer: ProfileVectorizer) -> Self {
        self.vectorizer = vectorizer;
        self
    }

    /// Whether a generation is currently queryable.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.generation.read().is_some()
    }

    /// Load the persisted generation, if any.
    ///
    /// With `lenient_snapshot_load`, any load failure falls back to a full
    /// [`refresh`](Self::refresh). Otherwise the error propagates and the
    /// service stays not ready; queries then degrade to neutral results
    /// instead of failing.
    pub async fn initialize(&self) -> Result<()> {
        match self.snapshots.load() {
            Ok(state) => {
                info!(users = state.len(), "loaded similarity snapshot");
                self.swap(Some(Arc::new(state)));
                Ok(())
            }
            Err(e) if self.options.lenient_snapshot_load => {
                warn!("snapshot unusable ({e}), rebuilding from profile store");
                self.refresh().await
            }
            Err(e) => Err(e),
        }
    }

    /// Rebuild the generation from the profile store and persist it.
    ///
    /// Serialized against itself. A fetch failure leaves the previous
    /// generation untouched and queryable. A store with no encodable data
    /// swaps the generation out and clears the snapshot.
    pub async fn refresh(&self) -> Result<()> {
        let _guard = self.refresh_guard.lock().await;

        let records = self.store.fetch_all().await?;
        debug!(rows = records.len(), "fetched profile rows");

        match self.vectorizer.build(&records) {
            Some(state) => {
                let state = Arc::new(state);
                info!(
                    users = state.len(),
                    width = state.vector_width(),
                    "derived new similarity generation"
                );
                self.swap(Some(state.clone()));
                self.snapshots.save(&state)?;
                Ok(())
            }
            None => {
                warn!("profile store yielded no encodable data, clearing generation");
                self.swap(None);
                self.snapshots.clear()?;
                Ok(())
            }
        }
    }

    /// Cosine similarity between two users in the current generation.
    ///
    /// Not ready degrades to the neutral score 0.0. Unknown ids are
    /// neutral too, unless `strict_ids` is set, in which case they surface
    /// as [`Error::UnknownUser`].
    pub fn get_similarity(&self, user_a: &str, user_b: &str) -> Result<f32> {
        let Some(state) = self.current() else {
            return Ok(0.0);
        };

        match (state.vector_of(user_a), state.vector_of(user_b)) {
            (Some(a), Some(b)) => Ok(a.cosine_similarity(b)),
            (None, _) => {
                self.degrade(user_a)?;
                Ok(0.0)
            }
            (_, None) => {
                self.degrade(user_b)?;
                Ok(0.0)
            }
        }
    }

    /// Rank every other user by similarity to `user_id`.
    ///
    /// Sorted by descending score; ties break on ascending user id so
    /// rankings are stable across runs. At most `top_n` entries, never
    /// including `user_id` itself. Not ready and unknown ids degrade to an
    /// empty ranking under the same policy as
    /// [`get_similarity`](Self::get_similarity).
    pub fn get_similar_users(&self, user_id: &str, top_n: usize) -> Result<Vec<SimilarUser>> {
        let Some(state) = self.current() else {
            return Ok(Vec::new());
        };

        let Some(target) = state.vector_of(user_id) else {
            self.degrade(user_id)?;
            return Ok(Vec::new());
        };

        let candidates: Vec<&str> = state.user_ids().filter(|id| *id != user_id).collect();
        let slices: Vec<&[f32]> = candidates
            .iter()
            .filter_map(|id| state.vector_of(id))
            .map(|vector| vector.as_slice())
            .collect();
        let scores = similarity::cosine_one_to_many(target.as_slice(), slices);

        let mut ranked: Vec<SimilarUser> = candidates
            .into_iter()
            .zip(scores)
            .map(|(id, score)| SimilarUser {
                user_id: id.to_string(),
                score,
            })
            .collect();

        ranked.sort_unstable_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        ranked.truncate(top_n);

        Ok(ranked)
    }

    /// Overall similarity plus per-attribute sub-scores.
    ///
    /// Each sub-score is the cosine over that attribute's slice of the two
    /// vectors. Degrades exactly like [`get_similarity`](Self::get_similarity).
    pub fn get_compatibility_breakdown(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<CompatibilityReport> {
        let Some(state) = self.current() else {
            return Ok(CompatibilityReport::neutral());
        };

        let (a, b) = match (state.vector_of(user_a), state.vector_of(user_b)) {
            (Some(a), Some(b)) => (a, b),
            (None, _) => {
                self.degrade(user_a)?;
                return Ok(CompatibilityReport::neutral());
            }
            (_, None) => {
                self.degrade(user_b)?;
                return Ok(CompatibilityReport::neutral());
            }
        };

        let overall = a.cosine_similarity(b);
        let mut breakdown = BTreeMap::new();
        for entry in state.layout().entries() {
            if entry.width == 0 {
                continue;
            }
            let range = entry.range();
            let score = similarity::cosine(&a.as_slice()[range.clone()], &b.as_slice()[range]);
            breakdown.insert(entry.attribute.clone(), score);
        }

        Ok(CompatibilityReport { overall, breakdown })
    }

    /// Report readiness, generation shape, and snapshot metadata.
    #[must_use]
    pub fn status(&self) -> StatusReport {
        let snapshot = self.snapshots.describe().ok();

        match self.current() {
            Some(state) => StatusReport {
                ready: true,
                users: state.len(),
                vector_width: state.vector_width(),
                attributes: state.layout().entries().to_vec(),
                snapshot,
            },
            None => StatusReport {
                ready: false,
                users: 0,
                vector_width: 0,
                attributes: Vec::new(),
                snapshot,
            },
        }
    }

    fn current(&self) -> Option<Arc<DerivedState>> {
        self.generation.read().clone()
    }

    fn swap(&self, next: Option<Arc<DerivedState>>) {
        *self.generation.write() = next;
    }

    /// Apply the unknown-id policy: error in strict mode, neutral otherwise.
    fn degrade(&self, user_id: &str) -> Result<()> {
        if self.options.strict_ids {
            Err(Error::UnknownUser(user_id.to_string()))
        } else {
            debug!(user_id, "unknown user id, returning neutral result");
            Ok(())
        }
    }
}
