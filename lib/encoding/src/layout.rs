//! Feature block layout
//!
//! Records where each attribute's indicator block lives inside the
//! composite vector. Blocks are contiguous and non-overlapping; the layout
//! is used both to build vectors and to slice them back apart for
//! per-attribute breakdowns.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Placement of one attribute's block inside the composite vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub attribute: String,
    pub start: usize,
    pub width: usize,
}

impl LayoutEntry {
    /// Index range of this block inside the composite vector.
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.width
    }
}

/// Ordered block layout covering one composite vector end to end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLayout {
    entries: Vec<LayoutEntry>,
}

impl FeatureLayout {
    /// Append the next block; blocks are laid out in call order.
    pub fn push(&mut self, attribute: impl Into<String>, width: usize) {
        let start = self.width();
        self.entries.push(LayoutEntry {
            attribute: attribute.into(),
            start,
            width,
        });
    }

    /// Total width covered by all blocks.
    #[must_use]
    pub fn width(&self) -> usize {
        self.entries
            .last()
            .map_or(0, |entry| entry.start + entry.width)
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    #[must_use]
    pub fn entry(&self, attribute: &str) -> Option<&LayoutEntry> {
        self.entries.iter().find(|entry| entry.attribute == attribute)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
