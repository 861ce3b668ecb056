//! Profile vectorizer
//!
//! Fits one encoder per tracked attribute over the full record set, then
//! encodes every user into a composite indicator vector. The tracked
//! attribute order is fixed for the lifetime of a generation.

use ahash::AHashMap;
use rapport_core::{UserRecord, Vector};
use serde::{Deserialize, Serialize};

use crate::encoder::{AttributeEncoder, AttributeKind};
use crate::layout::FeatureLayout;
use crate::state::DerivedState;

/// One tracked attribute: its row field name and encoding mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    pub kind: AttributeKind,
}

impl AttributeSpec {
    #[must_use]
    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Categorical,
        }
    }

    #[must_use]
    pub fn multi_label(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::MultiLabel,
        }
    }
}

/// Default tracked attributes, in block order.
#[must_use]
pub fn default_attributes() -> Vec<AttributeSpec> {
    vec![
        AttributeSpec::categorical("communication_style"),
        AttributeSpec::categorical("time_zone"),
        AttributeSpec::categorical("chronotype"),
        AttributeSpec::multi_label("availability"),
    ]
}

/// Builds [`DerivedState`] generations from raw profile rows.
#[derive(Debug, Clone)]
pub struct ProfileVectorizer {
    attributes: Vec<AttributeSpec>,
}

impl Default for ProfileVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileVectorizer {
    /// Vectorizer over the default tracked attributes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attributes: default_attributes(),
        }
    }

    /// Vectorizer over a custom attribute list.
    #[must_use]
    pub fn with_attributes(attributes: Vec<AttributeSpec>) -> Self {
        Self { attributes }
    }

    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    /// Derive a full generation from a record set.
    ///
    /// Returns `None` when there is nothing to derive: no records, or no
    /// tracked attribute with a non-empty vocabulary. Attributes whose
    /// vocabulary comes up empty are skipped wholesale, contributing no
    /// block and no layout entry. Duplicate user ids keep the last row.
    #[must_use]
    pub fn build(&self, records: &[UserRecord]) -> Option<DerivedState> {
        if records.is_empty() {
            return None;
        }

        // Last row wins for duplicated ids.
        let mut rows: AHashMap<&str, &UserRecord> = AHashMap::with_capacity(records.len());
        for record in records {
            rows.insert(record.user_id.as_str(), record);
        }

        let mut encoders = Vec::with_capacity(self.attributes.len());
        let mut layout = FeatureLayout::default();
        for spec in &self.attributes {
            let encoder = AttributeEncoder::fit(
                &spec.name,
                spec.kind,
                rows.values().map(|record| record.attribute(&spec.name)),
            );
            if encoder.is_empty() {
                continue;
            }
            layout.push(&spec.name, encoder.width());
            encoders.push(encoder);
        }

        if encoders.is_empty() {
            return None;
        }

        let width = layout.width();
        let mut vectors = AHashMap::with_capacity(rows.len());
        for (user_id, record) in rows {
            let mut components = Vec::with_capacity(width);
            for encoder in &encoders {
                encoder.encode_into(record.attribute(encoder.attribute()), &mut components);
            }
            vectors.insert(user_id.to_string(), Vector::new(components));
        }

        Some(DerivedState::new(encoders, layout, vectors))
    }
}
