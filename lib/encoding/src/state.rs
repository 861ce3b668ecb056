//! One generation of derived similarity state
//!
//! A [`DerivedState`] is built wholesale by the vectorizer and never
//! mutated afterward: queries read it, a refresh replaces it, the snapshot
//! store persists it as a single unit.

use ahash::AHashMap;
use rapport_core::Vector;
use serde::{Deserialize, Serialize};

use crate::encoder::AttributeEncoder;
use crate::layout::FeatureLayout;

/// Immutable bundle of encoders, layout, and per-user vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedState {
    encoders: Vec<AttributeEncoder>,
    layout: FeatureLayout,
    vectors: AHashMap<String, Vector>,
}

impl DerivedState {
    pub(crate) fn new(
        encoders: Vec<AttributeEncoder>,
        layout: FeatureLayout,
        vectors: AHashMap<String, Vector>,
    ) -> Self {
        Self {
            encoders,
            layout,
            vectors,
        }
    }

    #[inline]
    #[must_use]
    pub fn encoders(&self) -> &[AttributeEncoder] {
        &self.encoders
    }

    #[inline]
    #[must_use]
    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    #[inline]
    #[must_use]
    pub fn vector_of(&self, user_id: &str) -> Option<&Vector> {
        self.vectors.get(user_id)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, user_id: &str) -> bool {
        self.vectors.contains_key(user_id)
    }

    /// Ids of every user in this generation, in no particular order.
    pub fn user_ids(&self) -> impl Iterator<Item = &str> {
        self.vectors.keys().map(String::as_str)
    }

    /// Number of users carried by this generation.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Width of every vector in this generation.
    #[inline]
    #[must_use]
    pub fn vector_width(&self) -> usize {
        self.layout.width()
    }

    /// Whether the layout blocks tile the vector space from zero and every
    /// vector spans exactly that width.
    ///
    /// Built states hold this by construction; decoded snapshots are
    /// checked before queries slice vectors by block.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut width = 0;
        for entry in self.layout.entries() {
            if entry.start != width {
                return false;
            }
            width += entry.width;
        }
        self.vectors.values().all(|vector| vector.dim() == width)
    }
}
